// src/testing.rs
// Test-only helpers shared by the client, view and handler tests.

use actix_web::{web, App, HttpServer};
use std::net::{SocketAddr, TcpListener};

/// Starts an in-process stub of the simulation service on an ephemeral port and returns its base URL.
pub fn spawn_stub(configure: fn(&mut web::ServiceConfig)) -> String {
    let server = HttpServer::new(move || App::new().configure(configure))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind stub service");
    let addr: SocketAddr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

/// A base URL on which nothing is listening.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe socket");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}")
}
