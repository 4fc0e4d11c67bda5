//! Command-line argument parsing

use crate::config::ClientConfig;
use crate::model::{ImageIdentifier, TagStatus};
use crate::output::OutputFormat;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ecr-client")]
#[command(about = "Command-line client for the Amazon ECR API")]
#[command(version, author)]
pub struct Args {
    /// Region to send requests to
    #[arg(
        long = "region",
        global = true,
        help = "Region, e.g. us-east-1 (defaults to AWS_REGION)"
    )]
    pub region: Option<String>,

    /// Endpoint override
    #[arg(
        long = "endpoint-url",
        global = true,
        help = "Send requests to this URL instead of the regional endpoint"
    )]
    pub endpoint_url: Option<String>,

    /// Credentials profile
    #[arg(
        long = "profile",
        global = true,
        help = "Named profile in the shared credentials file"
    )]
    pub profile: Option<String>,

    /// Output format for results
    #[arg(
        long = "output",
        short = 'o',
        global = true,
        value_enum,
        default_value = "text",
        help = "Output format: text, json"
    )]
    pub output: OutputFormat,

    /// Timeout in seconds for each request
    #[arg(long = "timeout", short = 't', global = true)]
    pub timeout: Option<u64>,

    /// Skip TLS verification
    #[arg(
        long = "skip-tls",
        short = 'k',
        global = true,
        help = "Skip TLS certificate verification"
    )]
    pub skip_tls: bool,

    /// Configuration file path
    #[arg(
        long = "config",
        global = true,
        help = "Path to a JSON client configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(
        long = "verbose",
        short = 'v',
        global = true,
        help = "Enable verbose output"
    )]
    pub verbose: bool,

    /// Quiet mode
    #[arg(
        long = "quiet",
        short = 'q',
        global = true,
        conflicts_with = "verbose",
        help = "Only print results and errors"
    )]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Repository addressed by a command
#[derive(Debug, Clone, ClapArgs)]
pub struct RepositoryArgs {
    #[arg(long = "repository-name", short = 'n')]
    pub repository_name: String,

    /// Account id of the registry; defaults to the caller's account
    #[arg(long = "registry-id")]
    pub registry_id: Option<String>,
}

/// Paging controls shared by list commands
#[derive(Debug, Clone, ClapArgs)]
pub struct PageArgs {
    #[arg(long = "max-results")]
    pub max_results: Option<i32>,

    #[arg(long = "next-token")]
    pub next_token: Option<String>,

    /// Follow `nextToken` and print every page
    #[arg(long = "all", conflicts_with = "next_token")]
    pub all: bool,
}

/// Inline text or a file holding it
#[derive(Debug, Clone, ClapArgs)]
#[group(required = true, multiple = false)]
pub struct TextSource {
    #[arg(long = "text")]
    pub text: Option<String>,

    #[arg(long = "file")]
    pub file: Option<PathBuf>,
}

impl TextSource {
    pub fn read(&self) -> std::io::Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => std::fs::read_to_string(path),
            (None, None) => Ok(String::new()),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether layers exist in a repository
    BatchCheckLayerAvailability {
        #[command(flatten)]
        repo: RepositoryArgs,
        #[arg(long = "layer-digests", required = true, num_args = 1..)]
        layer_digests: Vec<String>,
    },

    /// Delete images by tag or digest
    BatchDeleteImage {
        #[command(flatten)]
        repo: RepositoryArgs,
        /// `tag`, `sha256:...` or `tag@sha256:...`
        #[arg(long = "image-ids", required = true, num_args = 1.., value_parser = parse_image_id)]
        image_ids: Vec<ImageIdentifier>,
    },

    /// Get images and their manifests
    BatchGetImage {
        #[command(flatten)]
        repo: RepositoryArgs,
        #[arg(long = "image-ids", required = true, num_args = 1.., value_parser = parse_image_id)]
        image_ids: Vec<ImageIdentifier>,
        #[arg(long = "accepted-media-types", num_args = 1..)]
        accepted_media_types: Vec<String>,
    },

    /// Finish a layer upload
    CompleteLayerUpload {
        #[command(flatten)]
        repo: RepositoryArgs,
        #[arg(long = "upload-id")]
        upload_id: String,
        #[arg(long = "layer-digests", required = true, num_args = 1..)]
        layer_digests: Vec<String>,
    },

    CreateRepository {
        #[arg(long = "repository-name", short = 'n')]
        repository_name: String,
    },

    DeleteLifecyclePolicy {
        #[command(flatten)]
        repo: RepositoryArgs,
    },

    DeleteRepository {
        #[command(flatten)]
        repo: RepositoryArgs,
        /// Delete the images in the repository too
        #[arg(long = "force")]
        force: bool,
    },

    DeleteRepositoryPolicy {
        #[command(flatten)]
        repo: RepositoryArgs,
    },

    DescribeImages {
        #[command(flatten)]
        repo: RepositoryArgs,
        #[arg(long = "image-ids", num_args = 1.., value_parser = parse_image_id)]
        image_ids: Vec<ImageIdentifier>,
        #[arg(long = "tag-status", value_parser = parse_tag_status)]
        tag_status: Option<TagStatus>,
        #[command(flatten)]
        page: PageArgs,
    },

    DescribeRepositories {
        #[arg(long = "registry-id")]
        registry_id: Option<String>,
        #[arg(long = "repository-names", num_args = 1..)]
        repository_names: Vec<String>,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Print a docker login token
    GetAuthorizationToken {
        #[arg(long = "registry-ids", num_args = 1..)]
        registry_ids: Vec<String>,
    },

    GetDownloadUrlForLayer {
        #[command(flatten)]
        repo: RepositoryArgs,
        #[arg(long = "layer-digest")]
        layer_digest: String,
    },

    GetLifecyclePolicy {
        #[command(flatten)]
        repo: RepositoryArgs,
    },

    GetRepositoryPolicy {
        #[command(flatten)]
        repo: RepositoryArgs,
    },

    /// Start a layer upload
    InitiateLayerUpload {
        #[command(flatten)]
        repo: RepositoryArgs,
    },

    ListImages {
        #[command(flatten)]
        repo: RepositoryArgs,
        #[arg(long = "tag-status", value_parser = parse_tag_status)]
        tag_status: Option<TagStatus>,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Create or update an image manifest
    PutImage {
        #[command(flatten)]
        repo: RepositoryArgs,
        #[command(flatten)]
        manifest: TextSource,
        #[arg(long = "image-tag")]
        image_tag: Option<String>,
    },

    PutLifecyclePolicy {
        #[command(flatten)]
        repo: RepositoryArgs,
        #[command(flatten)]
        policy: TextSource,
    },

    SetRepositoryPolicy {
        #[command(flatten)]
        repo: RepositoryArgs,
        #[command(flatten)]
        policy: TextSource,
        /// Skip the check that prevents locking yourself out
        #[arg(long = "force")]
        force: bool,
    },

    /// Upload one part of a layer from a file
    UploadLayerPart {
        #[command(flatten)]
        repo: RepositoryArgs,
        #[arg(long = "upload-id")]
        upload_id: String,
        #[arg(long = "part-first-byte", default_value = "0")]
        part_first_byte: i64,
        #[arg(long = "blob-file")]
        blob_file: PathBuf,
    },

    /// Upload whole layer files, skipping layers that already exist
    UploadLayer {
        #[command(flatten)]
        repo: RepositoryArgs,
        #[arg(long = "blob-file", required = true, num_args = 1..)]
        blob_files: Vec<PathBuf>,
        /// Part size in bytes; defaults to the size the service suggests
        #[arg(long = "part-size")]
        part_size: Option<usize>,
        /// Number of layers uploaded at the same time
        #[arg(long = "concurrency", short = 'j', default_value = "2")]
        concurrency: usize,
        /// Upload even if the layer already exists
        #[arg(long = "force")]
        force: bool,
    },

    /// Print a `docker login` command for the registry
    GetLogin {
        #[arg(long = "registry-ids", num_args = 1..)]
        registry_ids: Vec<String>,
    },
}

fn parse_image_id(value: &str) -> Result<ImageIdentifier, String> {
    if value.trim().is_empty() {
        return Err("image id cannot be empty".to_string());
    }
    Ok(ImageIdentifier::parse(value))
}

fn parse_tag_status(value: &str) -> Result<TagStatus, String> {
    match value.to_ascii_uppercase().as_str() {
        "TAGGED" => Ok(TagStatus::Tagged),
        "UNTAGGED" => Ok(TagStatus::Untagged),
        "ANY" => Ok(TagStatus::Any),
        other => Err(format!("unknown tag status '{}': expected TAGGED, UNTAGGED or ANY", other)),
    }
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate arguments
    pub fn validate(&self) -> Result<(), String> {
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be greater than 0".to_string());
            }
        }

        if let Some(endpoint) = &self.endpoint_url {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err("Endpoint URL must start with http:// or https://".to_string());
            }
        }

        if let Command::UploadLayer {
            blob_files,
            part_size,
            concurrency,
            ..
        } = &self.command
        {
            if *concurrency == 0 {
                return Err("Concurrency must be greater than 0".to_string());
            }
            if *part_size == Some(0) {
                return Err("Part size must be greater than 0".to_string());
            }
            if let Some(missing) = blob_files.iter().find(|path| !path.exists()) {
                return Err(format!("File does not exist: {}", missing.display()));
            }
        }

        Ok(())
    }

    /// Command-line values layered over `base`
    pub fn client_config(&self, base: ClientConfig) -> ClientConfig {
        let mut config = base;
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        if let Some(endpoint) = &self.endpoint_url {
            config.endpoint = Some(endpoint.clone());
        }
        if let Some(profile) = &self.profile {
            config.profile = Some(profile.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if self.skip_tls {
            config.skip_tls = true;
        }
        config
    }
}
