use std::time::Instant;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Data, Request, Response};

use crate::session::GuardRejection;

/// Fairing that logs one line per HTTP request with timing. Requests a
/// session guard turned away carry the rejection message in the line.
pub struct RequestLogger;

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request Logger",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _: &mut Data<'_>) {
        request.local_cache(Instant::now);
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let start_time = request.local_cache(Instant::now);
        let duration = start_time.elapsed();

        let method = request.method();
        let uri = request.uri();
        let status = response.status();

        match &request.local_cache(GuardRejection::default).0 {
            Some(rejection) => log::info!(
                "{} {} -> {} ({:.2}ms) [{rejection}]",
                method,
                uri,
                status.code,
                duration.as_secs_f64() * 1000.0
            ),
            None => log::info!(
                "{} {} -> {} ({:.2}ms)",
                method,
                uri,
                status.code,
                duration.as_secs_f64() * 1000.0
            ),
        }
    }
}
