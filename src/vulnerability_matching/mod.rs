/// Domain layer - artifact-to-repository matching
///
/// Pure business logic: no I/O, no network. Registry access and file
/// handling live behind the ports in `crate::ports`.
pub mod domain;
pub mod policies;
pub mod services;
