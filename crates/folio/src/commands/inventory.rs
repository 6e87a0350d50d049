//! `folio inventory` command implementation.

use clap::Args;

use super::{SiteArgs, find_page};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the inventory command.
#[derive(Args)]
pub(crate) struct InventoryArgs {
    /// Page path by uid; omit for the site root.
    #[arg(default_value = "")]
    page: String,
}

impl InventoryArgs {
    /// Execute the inventory command.
    pub(crate) fn execute(self, site_args: &SiteArgs, output: &Output) -> Result<(), CliError> {
        let site = site_args.open()?;
        let request = site.request();
        let page = find_page(&request, &self.page)?;

        output.json(&*request.inventory(page))
    }
}
