use crate::handlers::echo;
use anyhow::{Context, Result, anyhow};
use clap::Args;
use fnkit_core::config::ToolkitConfig;
use fnkit_core::ctx::{FunctionCtx, StreamResponse};
use http::Request;
use http::header::CONTENT_LENGTH;
use std::io::{Cursor, Write};

#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// HTTP method of the synthetic request
    #[arg(long, default_value = "GET")]
    pub method: String,

    /// Request target, path plus optional query string
    #[arg(long, default_value = "/")]
    pub uri: String,

    /// Extra request header as "name: value" (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Request body, sent with a matching content-length
    #[arg(long)]
    pub body: Option<String>,
}

pub fn run(args: InvokeArgs, config: &ToolkitConfig) -> Result<()> {
    let request = build_request(&args)?;
    let mut ctx = FunctionCtx::new(request, StreamResponse::new(Vec::new()), config);

    // A fatal error has already been logged by the context; still show
    // whatever part of the response made it out.
    let outcome = echo::handle(&mut ctx);
    let wire = ctx.into_response().into_inner();

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&wire)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;

    outcome.context("echo function aborted")
}

fn build_request(args: &InvokeArgs) -> Result<Request<Cursor<Vec<u8>>>> {
    let mut builder = Request::builder()
        .method(args.method.as_str())
        .uri(args.uri.as_str());

    for raw in &args.headers {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| anyhow!("invalid header '{raw}', expected 'name: value'"))?;
        builder = builder.header(name.trim(), value.trim());
    }

    let body = args.body.clone().unwrap_or_default().into_bytes();
    if args.body.is_some() {
        builder = builder.header(CONTENT_LENGTH, body.len().to_string());
    }

    builder
        .body(Cursor::new(body))
        .context("invalid request")
}
