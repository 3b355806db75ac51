// File: ./src/cli.rs
//! Command-line parsing and help text.
use std::path::PathBuf;

/// Largest sample `random` accepts.
pub const MAX_RANDOM_COUNT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Home,
    Search(String),
    Category(String),
    Categories,
    /// `None` means the configured default count.
    Random(Option<usize>),
    Show(String),
    Favorites,
    /// Toggle.
    Fav(String),
    Unfav(String),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub command: Command,
}

/// Parses arguments without the binary name.
pub fn parse_args<I, S>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut root = None;
    let mut verbose = false;
    let mut help = false;
    let mut positional: Vec<String> = Vec::new();

    let mut iter = args.into_iter().map(Into::into);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-r" | "--root" => {
                let path = iter.next().ok_or("--root requires a path")?;
                root = Some(PathBuf::from(path));
            }
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => help = true,
            _ => positional.push(arg),
        }
    }

    if help {
        return Ok(CliArgs {
            root,
            verbose,
            command: Command::Help,
        });
    }

    let mut words = positional.into_iter();
    let command = match words.next().as_deref() {
        None | Some("home") => Command::Home,
        Some("help") => Command::Help,
        Some("categories") => Command::Categories,
        Some("favorites") | Some("favs") => Command::Favorites,
        Some("search") => {
            let text = words.collect::<Vec<_>>().join(" ");
            if text.trim().is_empty() {
                return Err("search requires some text".to_string());
            }
            return Ok(CliArgs {
                root,
                verbose,
                command: Command::Search(text),
            });
        }
        Some("category") => {
            let name = words.collect::<Vec<_>>().join(" ");
            if name.trim().is_empty() {
                return Err("category requires a name".to_string());
            }
            return Ok(CliArgs {
                root,
                verbose,
                command: Command::Category(name),
            });
        }
        Some("random") => match words.next() {
            None => Command::Random(None),
            Some(n) => {
                let count: usize = n
                    .parse()
                    .map_err(|_| format!("'{}' is not a valid count", n))?;
                if count > MAX_RANDOM_COUNT {
                    return Err(format!("random count must be at most {}", MAX_RANDOM_COUNT));
                }
                Command::Random(Some(count))
            }
        },
        Some("show") => Command::Show(words.next().ok_or("show requires a recipe id")?),
        Some("fav") => Command::Fav(words.next().ok_or("fav requires a recipe id")?),
        Some("unfav") => Command::Unfav(words.next().ok_or("unfav requires a recipe id")?),
        Some(other) => return Err(format!("Unknown command '{}'", other)),
    };

    if let Some(extra) = words.next() {
        return Err(format!("Unexpected argument '{}'", extra));
    }

    Ok(CliArgs {
        root,
        verbose,
        command,
    })
}

pub fn print_help(binary_name: &str) {
    println!(
        "Recipebox v{} - Find recipes on TheMealDB and keep your favorites",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] [--verbose] [command]", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    home                  Featured recipes (default)");
    println!("    search <text>         Search recipes by name");
    println!("    category <name>       List the recipes of a category");
    println!("    categories            List categories");
    println!("    random [count]        Random recipes (at most {})", MAX_RANDOM_COUNT);
    println!("    show <id>             Full recipe");
    println!("    favorites             Your saved recipes");
    println!("    fav <id>              Save or unsave a recipe");
    println!("    unfav <id>            Remove a recipe from your favorites");
    println!("    help                  Show this help message");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -v, --verbose         Log debug output to stderr.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("EXAMPLES:");
    println!("    {} search arrabiata", binary_name);
    println!("    {} category Seafood", binary_name);
    println!("    {} fav 52771", binary_name);
}
