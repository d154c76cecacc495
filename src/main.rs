mod entry;
mod logger;

use stagger::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
