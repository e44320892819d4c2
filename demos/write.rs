use std::thread;
use std::time::Duration;

use usbcomm_serial::component::{Config, UsbCommunication};
use usbcomm_serial::transport::StdIoTransport;

const PORT_NAME: &str = "/dev/ttyUSB0";

/// Message type the device dispatches to its command handler.
const MSG_COMMAND: u8 = 0x02;

fn main() {
    let port = serialport::new(PORT_NAME, 115_200)
        .timeout(Duration::from_millis(10))
        .open();

    match port {
        Ok(port) => {
            let mut comm: UsbCommunication<_, (), 8, 8> =
                UsbCommunication::new(StdIoTransport::new(port), Config::default());
            comm.setup();
            comm.send(MSG_COMMAND, b"PING").unwrap();

            // drain the queue; the transport may accept the frame in pieces
            while comm.pending_tx() > 0 {
                comm.poll(&mut ());
                thread::sleep(Duration::from_millis(5));
            }
            println!("sent, stats = {:?}", comm.stats());
        }
        Err(e) => {
            eprintln!("Failed to open \"{}\". Error: {}", PORT_NAME, e);
            ::std::process::exit(1);
        }
    }
}
