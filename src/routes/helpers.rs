use std::error::Error;

use actix_web::HttpResponseBuilder;
use actix_web::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;

pub fn error_chain_fmt(e: &impl Error, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();

    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }

    Ok(())
}

/// Opens the response to any origin.
pub fn allow_any_origin(mut builder: HttpResponseBuilder) -> HttpResponseBuilder {
    builder.insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"));
    builder
}
