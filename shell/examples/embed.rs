//! Embed a subspace machine in your Rust application.
//!
//! Run:  cargo run -p subspace-shell --example embed

use subspace_config::ServerConfig;
use subspace_shell::ShellSession;
use subspace_sdk::ShellResult;

fn print_result(label: &str, output: &str) {
    println!("\n== {label} ==");
    if output.is_empty() {
        println!("<empty>");
    } else {
        println!("{output}");
    }
}

fn main() -> ShellResult<()> {
    let config = ServerConfig {
        hostname: "relay".to_string(),
        users: vec!["admin".to_string(), "guest".to_string()],
        ..ServerConfig::default()
    };
    let mut session = ShellSession::new(&config)?;
    let admin = session.user("admin")?;
    let guest = session.user("guest")?;

    println!("subspace embedded demo on {}", session.hostname());
    println!("prompt: {}", session.prompt(&admin, "{user}@{host}:{cwd}$ "));

    for line in [
        "mkdir logs",
        "echo \"boot ok\" > logs/boot.txt",
        "echo \"network ok\" >> logs/boot.txt",
        "cat logs/boot.txt",
        "ls -l",
        "man ls",
        "bogus",
    ] {
        let output = session.submit_command(&admin, line);
        print_result(line, &output);
    }

    // Each user keeps their own working directory.
    session.submit_command(&admin, "cd /etc");
    print_result("admin pwd", &session.submit_command(&admin, "pwd"));
    print_result("guest pwd", &session.submit_command(&guest, "pwd"));

    // `execute` keeps failures as errors instead of text.
    match session.execute(&guest, "rm /home/admin") {
        Ok(output) => print_result("rm", &output),
        Err(err) => println!("\n== rm failed ({}) ==\n{err}", err.category()),
    }

    Ok(())
}
