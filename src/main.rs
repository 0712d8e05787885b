//! Entry point: wires the transport, the brain, and the display together (§9A.5).

use stream_brain::brain::Brain;
use stream_brain::display::Display;
use stream_brain::error::BrainError;
use stream_brain::transport::{DEFAULT_ADDR, Transport};

fn main() {
    env_logger::init();

    let addr = parse_addr_flag(std::env::args().skip(1));
    let mut transport = match Transport::connect(&addr) {
        Ok(t) => t,
        Err(e) => {
            log::error!("failed to connect to teacher at {addr}: {e}");
            std::process::exit(1);
        }
    };

    let mut brain = Brain::new();
    let mut display = Display::new();
    let mut first_tick = true;

    loop {
        let reward = match transport.recv_reward() {
            Ok(r) => r,
            Err(e) => {
                log::error!("transport error receiving reward: {e}");
                std::process::exit(1);
            }
        };
        let teacher_char = match transport.recv_char() {
            Ok(c) => c,
            Err(e) => {
                log::error!("transport error receiving teacher character: {e}");
                std::process::exit(1);
            }
        };

        if first_tick {
            first_tick = false;
        } else if let Err(e) = brain.register_reward(reward, false) {
            handle_brain_error(e);
        }

        let reply = match brain.answer(teacher_char) {
            Ok(c) => c,
            Err(e) => handle_brain_error(e),
        };

        if let Err(e) = transport.send_reply(reply) {
            log::error!("transport error sending reply: {e}");
            std::process::exit(1);
        }

        display.push(reward, teacher_char, reply);
    }
}

fn handle_brain_error(e: BrainError) -> ! {
    log::error!("fatal protocol violation: {e}");
    std::process::exit(1);
}

fn parse_addr_flag(mut args: impl Iterator<Item = String>) -> String {
    while let Some(arg) = args.next() {
        if arg == "--addr" {
            if let Some(value) = args.next() {
                return value;
            }
        }
    }
    DEFAULT_ADDR.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_addr_flag_defaults_when_absent() {
        let args: Vec<String> = vec![];
        assert_eq!(parse_addr_flag(args.into_iter()), DEFAULT_ADDR);
    }

    #[test]
    fn parse_addr_flag_reads_override() {
        let args = vec!["--addr".to_string(), "10.0.0.1:9999".to_string()];
        assert_eq!(parse_addr_flag(args.into_iter()), "10.0.0.1:9999");
    }
}
