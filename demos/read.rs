use std::thread;
use std::time::Duration;

use usbcomm_serial::component::{Config, UsbCommunication};
use usbcomm_serial::transport::StdIoTransport;

const PORT_NAME: &str = "/dev/ttyUSB0";

/// Message type the device uses for its periodic reports.
const MSG_REPORT: u8 = 0x01;

fn main() {
    let port = serialport::new(PORT_NAME, 115_200)
        .timeout(Duration::from_millis(10))
        .open();

    match port {
        Ok(port) => {
            let mut comm: UsbCommunication<_, u32, 8, 8> =
                UsbCommunication::new(StdIoTransport::new(port), Config::default());
            comm.register_handler(MSG_REPORT, |count, data| {
                *count += 1;
                println!("report #{} = {:02x?}", count, data);
            })
            .unwrap();
            comm.setup();

            let mut received = 0u32;
            let mut last_stats = comm.stats();
            loop {
                comm.poll(&mut received);
                let stats = comm.stats();
                if stats != last_stats
                    && (stats.checksum_errors != last_stats.checksum_errors
                        || stats.unhandled_types != last_stats.unhandled_types)
                {
                    eprintln!("link errors = {:?}", stats);
                }
                last_stats = stats;
                thread::sleep(Duration::from_millis(5));
            }
        }
        Err(e) => {
            eprintln!("Failed to open \"{}\". Error: {}", PORT_NAME, e);
            ::std::process::exit(1);
        }
    }
}
