pub fn run() {
    println!("switchy {}", env!("CARGO_PKG_VERSION"));
}
