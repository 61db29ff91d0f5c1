/// Frame type and the compositor contract.
pub mod backend;
/// `vello_cpu` software compositor.
pub mod cpu;
