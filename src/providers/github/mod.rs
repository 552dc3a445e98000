mod client;
mod provider;
#[cfg(test)]
mod tests;
mod types;

pub use provider::GitHubProvider;
