//! Check system capabilities.

use pageshot_capture::backend::{detect_display_server, find_in_path, DisplayServer};

struct Tool {
    name: &'static str,
    purpose: &'static str,
    display: DisplayServer,
}

const TOOLS: &[Tool] = &[
    Tool {
        name: "grim",
        purpose: "screen capture",
        display: DisplayServer::Wayland,
    },
    Tool {
        name: "wtype",
        purpose: "page turning",
        display: DisplayServer::Wayland,
    },
    Tool {
        name: "import",
        purpose: "screen capture",
        display: DisplayServer::X11,
    },
    Tool {
        name: "xdotool",
        purpose: "page turning",
        display: DisplayServer::X11,
    },
];

pub fn run() -> anyhow::Result<()> {
    println!("PageShot System Check");
    println!("{}", "=".repeat(50));

    let ds = detect_display_server();
    match ds {
        DisplayServer::Wayland => println!("[OK] Display server: Wayland"),
        DisplayServer::X11 => println!("[OK] Display server: X11"),
        DisplayServer::Unknown => println!("[WARN] Display server: Unknown"),
    }

    let mut ready = ds != DisplayServer::Unknown;
    for tool in TOOLS {
        let needed = tool.display == ds;
        match find_in_path(tool.name) {
            Some(path) => println!("[OK] {} ({}): {}", tool.name, tool.purpose, path.display()),
            None if needed => {
                ready = false;
                println!("[MISSING] {} ({}) is required here", tool.name, tool.purpose);
            }
            None => println!("[--] {} ({}): not installed", tool.name, tool.purpose),
        }
    }

    println!(
        "[{}] xcap backend: {}",
        if cfg!(feature = "xcap") { "OK" } else { "--" },
        if cfg!(feature = "xcap") {
            "compiled in"
        } else {
            "not compiled in"
        }
    );

    println!();
    if ready {
        println!("All required tools are available. PageShot is ready to capture.");
    } else {
        println!("Some required tools are missing. Folder assembly still works.");
    }
    Ok(())
}
