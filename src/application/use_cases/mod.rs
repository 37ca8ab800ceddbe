/// Use cases module containing application business logic orchestration
mod match_vulnerabilities;
mod run_products;

pub use match_vulnerabilities::MatchVulnerabilitiesUseCase;
pub use run_products::run_products;
