//! TCP transport to the teacher process (§6, §9A.4).

use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;

/// The default teacher endpoint, used when no `--addr` override is given.
pub const DEFAULT_ADDR: &str = "127.0.0.1:5556";

/// A single paired connection to the teacher: one newline-delimited frame per message.
pub struct Transport {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Transport {
    /// Connects to `addr` and performs the startup handshake (`"hello"`).
    pub fn connect(addr: &str) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        let writer = stream.try_clone()?;
        let mut transport = Self {
            reader: BufReader::new(stream),
            writer,
        };
        transport.write_frame("hello")?;
        Ok(transport)
    }

    fn read_frame(&mut self) -> io::Result<String> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line)?;
        if n == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "teacher closed the connection"));
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    fn write_frame(&mut self, payload: &str) -> io::Result<()> {
        self.writer.write_all(payload.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    /// Receives the reward frame (`"1"`, `"-1"`, or blank) and maps it to `+`, `-`, or space.
    pub fn recv_reward(&mut self) -> io::Result<char> {
        let frame = self.read_frame()?;
        Ok(match frame.trim() {
            "1" => '+',
            "-1" => '-',
            _ => ' ',
        })
    }

    /// Receives exactly one teacher character.
    pub fn recv_char(&mut self) -> io::Result<char> {
        let frame = self.read_frame()?;
        Ok(frame.chars().next().unwrap_or(' '))
    }

    /// Sends the agent's one-character reply.
    pub fn send_reply(&mut self, reply: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.write_frame(reply.encode_utf8(&mut buf))
    }
}
