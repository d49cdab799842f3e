use base64::Engine as _;
use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;

    let secret = social_gql::state::generate_secret();
    let encoded = base64::engine::general_purpose::STANDARD.encode(secret);

    println!("Generated token signing secret:");
    println!("{}", encoded);
    println!();
    println!("You can use this secret as your JWT_SECRET environment variable.");
    println!("For example, add the following to your .env file:");
    println!("JWT_SECRET=\"{}\"", encoded);

    Ok(())
}
