use super::models::RunRequest;

const FUZZ_KEYWORD: &str = "FUZZ";

/// Builds the fuzzer argument list in a fixed order: target, wordlist,
/// method, headers, cookies, timeout, then the user's extra options.
pub fn build_command_args(request: &RunRequest) -> Vec<String> {
    let mut args = vec!["-u".to_string(), fuzz_target(&request.url)];

    if let Some(wordlist) = &request.wordlist {
        args.push("-w".to_string());
        args.push(wordlist.to_string_lossy().into_owned());
    }

    args.push("-X".to_string());
    args.push(request.method.clone());

    for (name, value) in &request.headers {
        args.push("-H".to_string());
        args.push(format!("{name}: {value}"));
    }

    if !request.cookies.is_empty() {
        let cookie = request
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        args.push("-H".to_string());
        args.push(format!("Cookie: {cookie}"));
    }

    args.push("-timeout".to_string());
    args.push(request.timeout_secs.to_string());

    // Validated by the session setter; an unsplittable value contributes nothing.
    if let Ok(extra) = shell_words::split(&request.extra_options) {
        args.extend(extra);
    }

    args
}

fn fuzz_target(url: &str) -> String {
    if url.contains(FUZZ_KEYWORD) {
        url.to_string()
    } else {
        format!("{}/{}", url.trim_end_matches('/'), FUZZ_KEYWORD)
    }
}
