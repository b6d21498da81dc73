//! TCP echo server on buffered streams: lines come in, lines go out.

use std::io::Result;
use std::net::SocketAddr;

use horus::detach;
use horus::io::{BufReader, BufWriter};
use horus::net::{TcpListener, TcpStream};

async fn handle_client(stream: TcpStream) -> Result<()> {
    let mut reader = BufReader::new(&stream);
    let mut writer = BufWriter::new(&stream);
    loop {
        let line = match reader.getline(b"\n").await {
            Ok(line) => line,
            // the peer hung up, we are done.
            Err(_) => return Ok(()),
        };
        writer.puts(&line).await?;
        writer.putchar(b'\n').await?;
        writer.flush().await?;
    }
}

#[horus::main]
async fn main() -> Result<()> {
    let addr: SocketAddr = ([127, 0, 0, 1], 8080).into();
    let listener = TcpListener::bind(addr)?;
    println!("echoing on {}", listener.local_addr()?);
    loop {
        let (stream, _) = listener.accept().await?;
        detach(async move {
            if let Err(err) = handle_client(stream).await {
                eprintln!("client failed: {err}");
            }
        });
    }
}
