use std::fmt;
use std::io::{stdin, stdout, Read, Stdout, Write};

use futures::stream::{self, StreamExt};
use gcode_intake::{ByteStreamExt, Command, CommandRecord, Config, Parser};

struct Reply(Stdout);

impl fmt::Write for Reply {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        self.0.flush().map_err(|_| fmt::Error)
    }
}

/// Prints what it receives and handles the mode switching codes.
fn execute(record: &mut CommandRecord, reply: &mut dyn fmt::Write) -> fmt::Result {
    match record.command {
        Command::General(20) => record.inches = true,
        Command::General(21) => record.inches = false,
        Command::General(90) => record.relative = false,
        Command::General(91) => record.relative = true,
        _ => {}
    }
    write!(reply, "{:?} target={:?} seen={:?}", record.command, record.target, record.seen)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let require_line_number = std::env::args().any(|arg| arg == "--line-numbers");
    let require_checksum = std::env::args().any(|arg| arg == "--checksums");
    let config = Config::default()
        .require_line_number(require_line_number)
        .require_checksum(require_checksum);

    let bytes = stdin().bytes().map_while(Result::ok);
    let mut lines = stream::iter(bytes).gcode_lines(Parser::new(config), execute, Reply(stdout()));

    futures_executor::block_on(async {
        while let Some(res) = lines.next().await {
            if let Err(e) = res {
                eprintln!("{:?}", e);
            }
        }
    });
}
