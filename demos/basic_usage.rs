use cognito_verify::Algorithm;
use cognito_verify::CognitoVerifier;
use cognito_verify::VerifierConfig;
use cognito_verify::VerifierSettings;
use cognito_verify::VerifyJwt;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example JWT token (this is just a placeholder - use a real token in practice)
    let token = "eyJraWQiOiJhYmNkZWZnIiwiYWxnIjoiUlMyNTYifQ...";

    // Example 1: Access tokens with default settings
    println!("=== Example 1: Access Tokens ===");
    let config = VerifierConfig::new("eu-west-1", "eu-west-1_AbCdEf123", "access")?;
    let verifier = CognitoVerifier::new(config);

    // Fail fast at startup if the pool's JWKS cannot be fetched
    if let Err(e) = verifier.warm_up().await {
        eprintln!("✗ Could not load JWKS for {}: {}", verifier.issuer(), e);
    }

    match verifier.verify(token).await {
        Ok(claims) => {
            println!("✓ Token verified successfully!");
            println!("  Subject: {:?}", claims.sub());
            println!("  Client: {:?}", claims.get("client_id"));
        }
        Err(e) if e.is_key_set_error() => eprintln!("✗ Trust material unavailable: {}", e),
        Err(e) => eprintln!("✗ Token rejected: {}", e),
    }

    println!();

    // Example 2: Id tokens, stricter age and a custom HTTP client
    println!("=== Example 2: Custom Configuration ===");
    let custom_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let config = VerifierConfig::new("eu-west-1", "eu-west-1_AbCdEf123", "id")?
        .with_algorithm(Algorithm::RS256)
        .with_token_expiration(Duration::from_secs(900))
        .with_http_client(custom_client);

    let verifier = CognitoVerifier::new(config);

    match verifier.verify(token).await {
        Ok(claims) => {
            println!("✓ Token verified successfully!");
            println!("  Email: {:?}", claims.get("email"));
        }
        Err(e) => eprintln!("✗ Token verification failed: {}", e),
    }

    println!();

    // Example 3: Settings read from a service's config file, JWKS from disk
    println!("=== Example 3: Settings and Local JWKS ===");
    let settings: VerifierSettings = serde_json::from_str(
        r#"{
            "region": "eu-west-1",
            "cognitoUserPoolId": "eu-west-1_AbCdEf123",
            "tokenUse": "access",
            "tokenExpiration": 3600000,
            "filepath": "jwks.json"
        }"#,
    )?;

    let verifier = CognitoVerifier::from_settings(settings)?;

    match verifier.verify(token).await {
        Ok(claims) => println!("✓ Token verified successfully! Subject: {:?}", claims.sub()),
        Err(e) => eprintln!("✗ Token verification failed: {}", e),
    }

    Ok(())
}
