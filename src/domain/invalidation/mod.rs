pub mod distribution_resolver;
pub mod invalidation_driver;
