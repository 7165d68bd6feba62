use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "glassify", version, about = "Remove image backgrounds through a relay")]
pub struct Cli {
    /// Config file, defaults to the platform config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the relay server
    Serve(ServeArgs),

    /// Remove the background of a local image
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address, overrides `relay.listen_addr`
    #[arg(long)]
    pub listen: Option<String>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    pub file: PathBuf,

    /// Relay endpoint, overrides `client.relay_url`
    #[arg(long)]
    pub relay: Option<String>,

    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Also write a before/after comparison image here
    #[arg(long)]
    pub compare: Option<PathBuf>,

    /// Comparison divider position in percent
    #[arg(long, default_value_t = 50.0)]
    pub divider: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["glassify", "serve", "--listen", "127.0.0.1:9000"]).unwrap();
        assert!(cli.config.is_none());
        match cli.command {
            Command::Serve(args) => assert_eq!(args.listen.as_deref(), Some("127.0.0.1:9000")),
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_remove() {
        let cli = Cli::try_parse_from([
            "glassify",
            "remove",
            "photo.jpg",
            "--compare",
            "cmp.png",
            "--config",
            "/tmp/g.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/g.toml")));
        match cli.command {
            Command::Remove(args) => {
                assert_eq!(args.file, PathBuf::from("photo.jpg"));
                assert_eq!(args.compare, Some(PathBuf::from("cmp.png")));
                assert!(args.out.is_none());
                assert_eq!(args.divider, 50.0);
            }
            _ => panic!("expected remove"),
        }
    }

    #[test]
    fn test_remove_requires_file() {
        assert!(Cli::try_parse_from(["glassify", "remove"]).is_err());
    }
}
