extern crate ahrs_ekf;

use ahrs_ekf::covariance::diagonal_process_noise;
use ahrs_ekf::nalgebra::Matrix3;
use ahrs_ekf::{Filter, FilterConfig, Real, Vector};
use std::io;
use std::io::BufRead;
use std::str::FromStr;

fn parse_float(s: &str) -> Real {
    Real::from_str(s).unwrap()
}

// format:
// ax ay az gx gy gz dt_s y p r
fn main() {
    let mut ekf = Filter::new(
        diagonal_process_noise(1e-6, 1e-10),
        FilterConfig::default().with_quaternion_variance(0.1),
    )
    .unwrap();
    let gravity = Vector::new(0.0, 0.0, 1.0);
    let accel_noise = Matrix3::from_diagonal_element(0.05);
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let l = match line {
            Ok(ll) => ll,
            Err(_e) => return,
        };
        let vec = l.split_whitespace().collect::<Vec<&str>>();
        if vec.len() < 10 {
            continue;
        }
        let accel = Vector::new(
            parse_float(vec[0]),
            parse_float(vec[1]),
            parse_float(vec[2]),
        );
        let gyro = Vector::new(
            parse_float(vec[3]),
            parse_float(vec[4]),
            parse_float(vec[5]),
        );
        let dt_s = parse_float(vec[6]);
        let (ry, rp, rr) = (
            parse_float(vec[7]),
            parse_float(vec[8]),
            parse_float(vec[9]),
        );
        if let Err(e) = ekf.predict(&gyro, dt_s) {
            eprintln!("skipping sample: {}", e);
            continue;
        }
        if accel.norm() > 0.0 {
            if let Err(e) = ekf.update(&accel.normalize(), &gravity, &accel_noise) {
                eprintln!("update failed: {}", e);
            }
        }
        let ypr = ekf.to_euler_angles();

        for f in [ypr.yaw, ypr.pitch, ypr.roll, ry, rp, rr].iter() {
            let mut b = ryu::Buffer::new();
            let s = b.format(*f);
            print!("{}, ", s);
        }
        println!();
    }
}
