//! Terminal output helpers.

use std::io::Write;

/// Redisplay the prompt after printing asynchronous output
pub fn redisplay_prompt(prompt: &str) {
    print!("{}", prompt);
    std::io::stdout().flush().ok();
}

/// Print formatted output (if any) and put the prompt back
pub fn show(output: &str, prompt: &str) {
    if output.is_empty() {
        return;
    }
    print!("{}", output);
    redisplay_prompt(prompt);
}
