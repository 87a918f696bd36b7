// Thin delegating binary.
//
// The actual server assembly lives in the `gateway-server` crate.
#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    gateway_server::run().await
}
