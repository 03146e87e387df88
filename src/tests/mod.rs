use std::io::Write;
use std::time::Duration;

use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::Options;
use crate::runner::Runner;

fn write_wordlist(dir: &tempfile::TempDir, words: &[&str]) -> String {
    let path = dir.path().join("wordlist.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{}", words.join("\n")).unwrap();
    path.to_string_lossy().to_string()
}

fn test_opts(dir: &tempfile::TempDir, target: &str, wordlist: &str) -> Options {
    let mut opts = Options::for_target(target);
    opts.wordlist_path = wordlist.to_string();
    opts.threads = 4;
    opts.timeout = Duration::from_secs(5);
    opts.no_color = true;
    opts.smart_filter = false;
    opts.duplicate_threshold = 0;
    opts.output_file = dir.path().join("output.txt").to_string_lossy().to_string();
    opts
}

fn read_output(opts: &Options) -> String {
    std::fs::read_to_string(&opts.output_file).unwrap_or_default()
}

async fn run(opts: Options) {
    Runner::new(opts).unwrap().run().await.unwrap();
}

#[tokio::test]
async fn basic_discovery_reports_only_existing_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("admin page"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("login page"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let wordlist = write_wordlist(&dir, &["admin", "login", "notexist"]);
    let mut opts = test_opts(&dir, &server.uri(), &wordlist);
    opts.exclude_status = vec![404];

    run(opts.clone()).await;

    let out = read_output(&opts);
    assert!(out.contains("/admin"), "expected /admin in output:\n{out}");
    assert!(out.contains("/login"), "expected /login in output:\n{out}");
    assert!(!out.contains("/notexist"), "unexpected /notexist in output:\n{out}");
}

#[tokio::test]
async fn smart_filter_suppresses_soft_404s() {
    let soft404 = "Page not found. This is a custom 404 page with some content that looks real.";

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "Welcome to the real admin panel. This is unique content that differs from the 404 page.",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(soft404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let wordlist = write_wordlist(&dir, &["admin", "fakeone", "faketwo", "fakethree"]);
    let mut opts = test_opts(&dir, &server.uri(), &wordlist);
    opts.smart_filter = true;
    opts.smart_filter_threshold = 50;

    run(opts.clone()).await;

    let out = read_output(&opts);
    assert!(out.contains("/admin"), "expected /admin in output:\n{out}");
    assert!(!out.contains("/fakeone"), "soft-404 /fakeone not filtered:\n{out}");
    assert!(!out.contains("/faketwo"), "soft-404 /faketwo not filtered:\n{out}");
    assert!(!out.contains("/fakethree"), "soft-404 /fakethree not filtered:\n{out}");
}

#[tokio::test]
async fn method_fuzzing_reports_the_matching_method() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("upload ok"))
        .mount(&server)
        .await;
    Mock::given(path_regex(".*"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let wordlist = write_wordlist(&dir, &["upload"]);
    let mut opts = test_opts(&dir, &server.uri(), &wordlist);
    opts.methods = vec!["GET".into(), "POST".into()];
    opts.exclude_status = vec![404];

    run(opts.clone()).await;

    let out = read_output(&opts);
    let result_lines: Vec<&str> = out.lines().filter(|l| l.contains("/upload")).collect();
    assert_eq!(result_lines.len(), 1, "expected exactly one result line:\n{out}");
    assert!(result_lines[0].contains("[POST]"), "expected [POST] prefix:\n{out}");
}

#[tokio::test]
async fn crawl_discovers_linked_paths_outside_the_wordlist() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><a href="/hidden">link</a></body></html>"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(ResponseTemplate::new(200).set_body_string("secret page"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let wordlist = write_wordlist(&dir, &["index"]);
    let mut opts = test_opts(&dir, &server.uri(), &wordlist);
    opts.crawl = true;
    opts.crawl_depth = 2;
    opts.exclude_status = vec![404];

    run(opts.clone()).await;

    let out = read_output(&opts);
    assert!(out.contains("/index"), "expected /index in output:\n{out}");
    assert!(out.contains("/hidden"), "expected crawled /hidden in output:\n{out}");
}

#[tokio::test]
async fn recursion_skips_catch_all_subtrees() {
    let soft404 = "This is a custom error page that looks legit but is really a soft 404.";
    let subdir_404 = "The admin area could not find the page you were looking for, sorry.";

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("real admin landing page with plenty of unique content"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/panel"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("the admin panel itself, totally unique content here"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/admin/.*"))
        .respond_with(ResponseTemplate::new(200).set_body_string(subdir_404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ghost"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("ghost landing page that looks real enough to pass"),
        )
        .mount(&server)
        .await;
    // /ghost/ and everything under it serves the root catch-all page.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(soft404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let wordlist = write_wordlist(&dir, &["admin", "ghost", "panel"]);
    let mut opts = test_opts(&dir, &server.uri(), &wordlist);
    opts.smart_filter = true;
    opts.smart_filter_threshold = 50;
    opts.recursive = true;
    opts.max_depth = 1;

    run(opts.clone()).await;

    let out = read_output(&opts);
    assert!(out.contains("/admin"), "expected /admin in output:\n{out}");
    assert!(out.contains("/admin/panel"), "recursion should enter /admin/:\n{out}");
    assert!(!out.contains("/ghost/"), "recursion should skip the /ghost/ subtree:\n{out}");
    assert!(!out.contains("/admin/ghost"), "subdir soft-404 not filtered:\n{out}");
}

#[tokio::test]
async fn vhost_mode_fuzzes_host_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("host", "admin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("internal admin site"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("unknown vhost"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let hosts = write_wordlist(&dir, &["admin", "dev", "staging"]);
    let mut opts = test_opts(&dir, &server.uri(), "");
    opts.vhost = true;
    opts.vhost_wordlist = hosts;
    opts.exclude_status = vec![404];

    run(opts.clone()).await;

    let out = read_output(&opts);
    assert!(out.contains("[admin]"), "expected vhost hit for admin:\n{out}");
    assert!(!out.contains("[dev]"), "unexpected vhost hit for dev:\n{out}");
    assert!(!out.contains("[staging]"), "unexpected vhost hit for staging:\n{out}");
}

#[tokio::test]
async fn resume_skips_completed_paths_and_cleans_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("page content"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let wordlist = write_wordlist(&dir, &["admin", "login"]);
    let resume_file = dir.path().join("scan.state");

    let state = crate::resume::ResumeState::new(&resume_file, server.uri(), 2);
    state.mark_completed("admin");
    state.save().unwrap();

    let mut opts = test_opts(&dir, &server.uri(), &wordlist);
    opts.resume_file = resume_file.to_string_lossy().to_string();

    run(opts.clone()).await;

    let out = read_output(&opts);
    assert!(!out.contains("/admin"), "resumed scan should skip /admin:\n{out}");
    assert!(out.contains("/login"), "expected /login in output:\n{out}");
    assert!(!resume_file.exists(), "resume file should be removed on success");
}

#[tokio::test]
async fn resume_for_a_different_target_starts_fresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("page content"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let wordlist = write_wordlist(&dir, &["admin"]);
    let resume_file = dir.path().join("scan.state");

    let stale = crate::resume::ResumeState::new(&resume_file, "http://other.example.com", 1);
    stale.mark_completed("admin");
    stale.save().unwrap();

    let mut opts = test_opts(&dir, &server.uri(), &wordlist);
    opts.resume_file = resume_file.to_string_lossy().to_string();

    run(opts.clone()).await;

    let out = read_output(&opts);
    assert!(out.contains("/admin"), "URL mismatch should reset resume state:\n{out}");
}

#[tokio::test]
async fn eta_abort_skips_hopeless_targets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow response")
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let words: Vec<String> = (0..1000).map(|i| format!("path{i}")).collect();
    let word_refs: Vec<&str> = words.iter().map(String::as_str).collect();
    let wordlist = write_wordlist(&dir, &word_refs);

    let mut opts = test_opts(&dir, &server.uri(), &wordlist);
    opts.threads = 10;
    opts.max_eta = Duration::from_secs(1);

    let start = std::time::Instant::now();
    run(opts).await;
    let elapsed = start.elapsed();

    // Full projection is 1000 * 50ms / 10 threads = 5s minimum; the abort
    // should fire right after the 100-request estimation window.
    assert!(elapsed < Duration::from_secs(4), "ETA abort took too long: {elapsed:?}");
}

#[tokio::test]
async fn duplicate_filter_caps_repeated_response_shapes() {
    let server = MockServer::start().await;
    // A catch-all login page under /app with one fixed body.
    Mock::given(method("GET"))
        .and(path_regex("^/app.*"))
        .respond_with(ResponseTemplate::new(200).set_body_string("please sign in to continue to the app"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let words: Vec<String> = (0..10).map(|i| format!("app/page{i}")).collect();
    let word_refs: Vec<&str> = words.iter().map(String::as_str).collect();
    let wordlist = write_wordlist(&dir, &word_refs);

    let mut opts = test_opts(&dir, &server.uri(), &wordlist);
    opts.duplicate_threshold = 2;
    opts.exclude_status = vec![404];

    run(opts.clone()).await;

    let out = read_output(&opts);
    let hits = out.lines().filter(|l| l.contains("/app/page")).count();
    assert_eq!(hits, 2, "expected exactly threshold-many duplicates:\n{out}");
}
