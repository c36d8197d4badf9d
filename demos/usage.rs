extern crate ahrs_ekf;

use ahrs_ekf::covariance::diagonal_process_noise;
use ahrs_ekf::{Filter, FilterConfig, Vector};

fn main() {
    let mut ekf = Filter::new(diagonal_process_noise(1e-6, 1e-10), FilterConfig::default())
        .expect("default configuration is valid");
    ekf.predict(&Vector::new(0.0, 0.0, 0.0), 0.1)
        .expect("zero rate with positive dt is valid");
    println!("{:?}", ekf.to_euler_angles());
}
