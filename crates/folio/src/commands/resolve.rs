//! `folio resolve` command implementation.

use clap::Args;
use folio_site::Request;
use serde_json::{Value, json};

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Request path, optionally prefixed with a language code (e.g. `de/blog`).
    path: String,

    /// Print content and identifiers in this language instead of the routed one.
    #[arg(short, long)]
    lang: Option<String>,
}

impl ResolveArgs {
    /// Execute the resolve command.
    pub(crate) fn execute(self, site_args: &SiteArgs, output: &Output) -> Result<(), CliError> {
        let site = site_args.open()?;
        let request = site.request();

        output.json(&resolve(&request, &self.path, self.lang.as_deref()))
    }
}

/// Route `path` and describe the result.
fn resolve(request: &Request<'_>, path: &str, lang: Option<&str>) -> Value {
    let route = request.route(path);

    let (page, content) = match route.page {
        Some(id) => {
            let page = request.page(id);
            (
                serde_json::to_value(page.identity(lang)).unwrap_or(Value::Null),
                serde_json::to_value(&*page.content(lang)).unwrap_or(Value::Null),
            )
        }
        None => (Value::Null, Value::Null),
    };

    json!({
        "route": route.kind,
        "language": request.language().code,
        "page": page,
        "content": content,
    })
}
