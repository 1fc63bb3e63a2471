use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "contacts", version, about = "Session-based contact manager")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the web server (the default).
    Serve,
    /// Print an argon2 hash for a credentials file entry.
    HashPassword {
        #[arg(env = "CONTACTS_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

impl Cli {
    pub fn action(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["contacts"]).unwrap();
        assert_eq!(cli.action(), &Command::Serve);
    }

    #[test]
    fn hash_password_takes_plaintext() {
        let cli = Cli::try_parse_from(["contacts", "hash-password", "adminsecret"]).unwrap();
        assert_eq!(
            cli.action(),
            &Command::HashPassword {
                password: "adminsecret".into()
            }
        );
    }

    #[test]
    fn unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["contacts", "explode"]).is_err());
    }
}
