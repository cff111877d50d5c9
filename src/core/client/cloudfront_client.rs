use aws_sdk_cloudfront::Client;
use tracing::debug;

/// Creates a CloudFront client from the default AWS credential chain
/// (environment, profile, web identity, instance metadata).
pub async fn build_cloudfront_client() -> Client {
    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    debug!(region = ?config.region(), "CloudFront client initialized");
    Client::new(&config)
}
