#[macro_use]
extern crate rocket;

#[launch]
fn rocket() -> _ {
    todo_api_server::rocket()
}
