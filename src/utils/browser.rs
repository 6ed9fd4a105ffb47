//! Best-effort "open this URL" through the host's default handler.

use anyhow::Result;

use super::exec::Cmd;

/// Build the platform command that opens `url` in the default browser.
pub fn open_command(url: &str) -> Cmd {
    #[cfg(target_os = "macos")]
    {
        Cmd::new("open").arg(url)
    }

    #[cfg(target_os = "windows")]
    {
        Cmd::new("rundll32").args(["url.dll,FileProtocolHandler", url])
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        Cmd::new("xdg-open").arg(url)
    }
}

/// Open `url` in the default browser. The launcher is reaped in the background.
pub fn open(url: &str) -> Result<()> {
    open_command(url).spawn_detached()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_command_carries_url() {
        let cmd = format!("{:?}", open_command("http://127.0.0.1:6942"));
        assert!(cmd.contains("http://127.0.0.1:6942"));
    }
}
