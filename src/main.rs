use std::collections::BTreeSet;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use promptify::{
    cli, config, error,
    presentation::{Filters, LibraryStatus, LyricType, SortKey},
    types::AlbumType,
    utils,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the backend proxy
    Serve,

    /// Authorize with Spotify through the backend proxy
    Login,

    /// Forget the stored Spotify tokens
    Logout,

    /// Turn a prompt into a list of songs
    Generate(GenerateOptions),

    /// Show the songs of the last generation
    Songs(ViewOptions),

    /// Add a song to your Spotify library
    Like(SongId),

    /// Remove a song from your Spotify library
    Unlike(SongId),

    /// Curate and play the playlist
    Playlist(PlaylistOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateOptions {
    /// What the songs should feel like, e.g. "rainy sunday jazz"
    #[clap(required = true, num_args = 1..)]
    pub prompt: Vec<String>,

    /// Skip the library status lookup
    #[clap(long)]
    pub no_annotate: bool,

    #[clap(flatten)]
    pub view: ViewOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct ViewOptions {
    /// Sort order of the song list
    #[clap(long, value_enum, default_value_t = SortKey::MostPopular)]
    pub sort: SortKey,

    /// Release type(s) to show; can be repeated or comma-separated, or "all"
    #[clap(
        long = "release-type",
        value_parser = utils::parse_release_types,
        action = ArgAction::Append,
        num_args = 1
    )]
    pub release_types: Vec<BTreeSet<AlbumType>>,

    /// Lyric type(s) to show
    #[clap(long = "lyrics", value_enum, value_delimiter = ',')]
    pub lyric_types: Vec<LyricType>,

    /// Library status(es) to show
    #[clap(long = "library", value_enum, value_delimiter = ',')]
    pub library_statuses: Vec<LibraryStatus>,
}

impl ViewOptions {
    fn filters(&self) -> Filters {
        Filters {
            release_types: self.release_types.iter().flatten().cloned().collect(),
            lyric_types: self.lyric_types.iter().copied().collect(),
            library_statuses: self.library_statuses.iter().copied().collect(),
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SongId {
    /// Spotify track id as shown in the song table
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Curate and play the playlist")]
pub struct PlaylistOptions {
    /// Subcommands under `playlist`; lists the playlist when omitted
    #[command(subcommand)]
    pub command: Option<PlaylistSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistSubcommand {
    /// Show the playlist in insertion order
    List,

    /// Add songs by id
    Add(SongIds),

    /// Remove songs by id
    Remove(SongIds),

    /// Add the song, or remove it when it already is in the playlist
    Toggle(SongId),

    /// Play one song, or the whole playlist without an id
    Play(PlayOpts),

    /// Pause playback
    Pause,

    /// Resume playback
    Resume,

    /// Rename the playlist
    Rename(RenameOpts),

    /// Save the playlist to your Spotify account
    Save,
}

#[derive(Parser, Debug, Clone)]
pub struct SongIds {
    #[clap(required = true, num_args = 1..)]
    pub ids: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayOpts {
    pub id: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct RenameOpts {
    #[clap(required = true, num_args = 1..)]
    pub name: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve().await,
        Command::Login => cli::login().await,
        Command::Logout => cli::logout().await,
        Command::Generate(opt) => {
            let prompt = opt.prompt.join(" ");
            cli::generate(&prompt, !opt.no_annotate, opt.view.sort, &opt.view.filters()).await
        }
        Command::Songs(opt) => cli::songs(opt.sort, &opt.filters()).await,
        Command::Like(opt) => cli::like(&opt.id).await,
        Command::Unlike(opt) => cli::unlike(&opt.id).await,

        Command::Playlist(opt) => match opt.command {
            None | Some(PlaylistSubcommand::List) => cli::playlist::list().await,
            Some(PlaylistSubcommand::Add(o)) => cli::playlist::add(&o.ids).await,
            Some(PlaylistSubcommand::Remove(o)) => cli::playlist::remove(&o.ids).await,
            Some(PlaylistSubcommand::Toggle(o)) => cli::playlist::toggle(&o.id).await,
            Some(PlaylistSubcommand::Play(o)) => cli::playlist::play(o.id.as_deref()).await,
            Some(PlaylistSubcommand::Pause) => cli::playlist::pause().await,
            Some(PlaylistSubcommand::Resume) => cli::playlist::resume().await,
            Some(PlaylistSubcommand::Rename(o)) => cli::playlist::rename(&o.name.join(" ")).await,
            Some(PlaylistSubcommand::Save) => cli::playlist::save().await,
        },

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
