mod application;
mod presentation;

use qrx_core::error::Result;

fn main() -> Result<()> {
    application::run()
}
