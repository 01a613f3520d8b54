use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};

#[derive(Parser, Debug)]
#[command(
    name = "generate_keys",
    about = "Generate the RSA key pair used to sign session tokens"
)]
struct Args {
    /// Path for the PKCS#8 private key PEM.
    #[arg(long, default_value = "private.pem")]
    private_out: PathBuf,

    /// Path for the SPKI public key PEM.
    #[arg(long, default_value = "public.pem")]
    public_out: PathBuf,

    /// RSA modulus size in bits.
    #[arg(long, default_value_t = 2048)]
    bits: usize,

    /// Overwrite existing key files.
    #[arg(long)]
    force: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    if !args.force {
        for path in [&args.private_out, &args.public_out] {
            if path.exists() {
                writeln!(
                    io::stderr(),
                    "error: {} already exists. Pass --force to overwrite.",
                    path.display()
                )?;
                std::process::exit(1);
            }
        }
    }

    log::info!("generating {}-bit RSA key pair", args.bits);

    let mut rng = rand::thread_rng();
    let private_key = RsaPrivateKey::new(&mut rng, args.bits)?;
    let public_key = RsaPublicKey::from(&private_key);

    let private_pem = private_key.to_pkcs8_pem(LineEnding::LF)?;
    let public_pem = public_key.to_public_key_pem(LineEnding::LF)?;

    fs::write(&args.private_out, private_pem.as_bytes())?;
    fs::write(&args.public_out, public_pem.as_bytes())?;

    println!(
        "Wrote {} and {}",
        args.private_out.display(),
        args.public_out.display()
    );
    Ok(())
}
