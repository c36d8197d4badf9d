extern crate ahrs_ekf;
extern crate csv;

use ahrs_ekf::covariance::diagonal_process_noise;
use ahrs_ekf::nalgebra::Matrix3;
use ahrs_ekf::{Filter, FilterConfig, Real, Vector};
use std::io;
use std::str::FromStr;

fn parse_float(s: &str) -> Real {
    Real::from_str(s).unwrap()
}

fn parse_int(s: &str) -> u32 {
    u32::from_str(s).unwrap()
}

fn time(sr: &csv::StringRecord) -> f64 {
    let tv_sec = parse_int(sr.get(0).unwrap());
    let tv_usec = parse_int(sr.get(1).unwrap());
    tv_sec as f64 + tv_usec as f64 / 1000000.0
}

fn vector(sr: &csv::StringRecord, first: usize) -> Vector {
    Vector::new(
        parse_float(sr.get(first).unwrap()),
        parse_float(sr.get(first + 1).unwrap()),
        parse_float(sr.get(first + 2).unwrap()),
    )
}

// CSV should be formated as follows:
// "tsecs","tusecs","gx","gy","gz","ax","ay","az","yaw","pitch","roll",
// where yaw,pitch,roll are expected results to compare against.
// Gyro in rad/s; accel in any unit, it is normalized before use.
fn main() {
    let mut ekf = Filter::new(
        diagonal_process_noise(1e-6, 1e-10),
        FilterConfig::default().with_quaternion_variance(0.1),
    )
    .unwrap();
    let gravity = Vector::new(0.0, 0.0, 1.0);
    let accel_noise = Matrix3::from_diagonal_element(0.05);
    let mut rdr = csv::Reader::from_reader(io::stdin());
    let mut prev_t: f64 = 0.0;
    for result in rdr.records() {
        let record = result.unwrap();
        let time = time(&record);
        let gyro = vector(&record, 2);
        let accel = vector(&record, 5);
        let reference = vector(&record, 8);
        let dt = time - prev_t;
        let first = prev_t == 0.0;
        prev_t = time;
        if first {
            continue;
        }
        if let Err(e) = ekf.predict(&gyro, dt as Real) {
            eprintln!("skipping sample at {}: {}", time, e);
            continue;
        }
        if accel.norm() > 0.0 {
            if let Err(e) = ekf.update(&accel.normalize(), &gravity, &accel_noise) {
                eprintln!("update at {} failed: {}", time, e);
            }
        }
        let euler_angles = ekf.to_euler_angles();
        println!(
            "{:2.8},{:2.8},{:2.8},{:2.8},{:2.8},{:2.8}",
            euler_angles.yaw,
            euler_angles.pitch,
            euler_angles.roll,
            reference.x,
            reference.y,
            reference.z
        );
    }
}
