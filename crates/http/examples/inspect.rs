use http::Method;
use http1_model::protocol::{HeaderField, HeaderValue, HttpError, Request, RequestTarget};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), HttpError> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let request = Request::builder()
        .method(Method::POST)
        .scheme("https")
        .host("api.example.com")
        .path("/v1/widgets")
        .query("dry_run=true")
        .header(HeaderField::new("Accept", HeaderValue::new("application/json")?))
        .header(HeaderField::new("X-Request-Id", HeaderValue::new("3f1a8c")?))
        .body(&br#"{"name":"sprocket"}"#[..])
        .build()?;

    request.validate()?;
    info!(line = %request.request_line(), "built a valid request");

    println!("{request}");
    println!();

    let encoded = serde_json::to_string_pretty(&request).expect("request is serializable");
    println!("{encoded}");

    // authority form is CONNECT-only, so this one fails validation
    let tunnel = Request::new(Method::GET, RequestTarget::authority("example.com:443"));
    if let Err(cause) = tunnel.validate() {
        info!(%cause, "rejected an invalid method/target pair");
    }

    Ok(())
}
