/// Inbound ports (Driving ports) - Use case interfaces
///
/// These ports define the interfaces that external adapters (e.g., CLI)
/// use to interact with the application core.
pub mod vulnerability_matching_port;

pub use vulnerability_matching_port::VulnerabilityMatchingPort;
