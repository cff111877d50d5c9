pub mod cdn_provider_trait;
pub mod cloudfront_provider;
