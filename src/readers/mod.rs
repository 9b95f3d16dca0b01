pub mod hygrometric_reader;
pub mod observation_reader;
pub mod pressure_reader;
pub mod tables;

pub use hygrometric_reader::HygrometricReader;
pub use observation_reader::ObservationReader;
pub use pressure_reader::PressureReader;
pub use tables::ReferenceTables;
