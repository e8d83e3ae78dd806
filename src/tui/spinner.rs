use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::view::ViewState;

pub const GIT_SYNC: &str = "Git sync...";

fn start(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Show a spinner while a blocking operation runs
pub fn spin<T>(message: &str, operation: impl FnOnce() -> T) -> T {
    let spinner = start(message);
    let result = operation();
    spinner.finish_and_clear();
    result
}

pub async fn spin_async<T>(message: &str, operation: impl Future<Output = T>) -> T {
    let spinner = start(message);
    let result = operation.await;
    spinner.finish_and_clear();
    result
}

/// [`spin`] with the view held in its loading state
pub fn run<T>(view: &mut ViewState, message: &str, operation: impl FnOnce() -> T) -> T {
    view.begin_loading();
    let result = spin(message, operation);
    view.end_loading();
    result
}

/// [`spin_async`] with the view held in its loading state
pub async fn run_async<T>(
    view: &mut ViewState,
    message: &str,
    operation: impl Future<Output = T>,
) -> T {
    view.begin_loading();
    let result = spin_async(message, operation).await;
    view.end_loading();
    result
}
