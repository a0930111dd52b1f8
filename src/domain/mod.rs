// Domain layer: gallery models and the ports the modal controller talks through.

pub mod model;
pub mod ports;
