/// Builds the shared `reqwest::Client` with the archiver user-agent.
///
/// Evaluates to a `Result<Client, reqwest::Error>`.
#[macro_export]
macro_rules! client {
    () => {{
        $crate::reqwest::Client::builder()
            .user_agent($crate::user_agent())
            .build()
    }};
}

/// Joins a list of tokens with single spaces.
#[macro_export]
macro_rules! join_tags {
    ($x:expr) => {{
        let tl = $x.join(" ");
        tl
    }};
}
