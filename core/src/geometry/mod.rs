pub mod coords;

pub use coords::{cartesian_to_azel, cartesian_to_spherical, spherical_to_cartesian};
