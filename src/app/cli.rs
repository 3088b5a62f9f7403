use clap::Parser;
use std::fs;
use std::path::PathBuf;

use crate::constants::{DEFAULT_CHECKPOINT_FILE, PROGRESS_INTERVAL_MS, SEED_SPACE};
use crate::core::position::{ChunkPos, ChunkRect};
use crate::error::{Error, Result};
use crate::save::{default_checkpoint_path, load_checkpoint};
use crate::search::{RequiredItem, SearchRequest, StructureTarget};

#[derive(Parser, Debug)]
#[command(
    name = "templeseed",
    version,
    about = "Search Bedrock world seeds for desert pyramids with the loot you want",
    long_about = None
)]
pub struct Args {
    /// Pyramid must generate in this chunk
    #[arg(
        long,
        value_name = "X,Z",
        value_parser = parse_chunk,
        allow_hyphen_values = true,
        conflicts_with_all = ["area", "targets"]
    )]
    pub chunk: Option<ChunkPos>,

    /// Pyramid may generate anywhere in this chunk rectangle (inclusive)
    #[arg(
        long,
        value_name = "MINX,MINZ,MAXX,MAXZ",
        value_parser = parse_area,
        allow_hyphen_values = true,
        conflicts_with = "targets"
    )]
    pub area: Option<ChunkRect>,

    /// JSON file holding a list of targets
    #[arg(long, value_name = "FILE")]
    pub targets: Option<PathBuf>,

    /// Required item for the --chunk/--area target, e.g. diamond>=2 or emerald==1@0
    #[arg(
        long = "require",
        value_name = "SPEC",
        value_parser = parse_requirement,
        conflicts_with = "targets"
    )]
    pub require: Vec<RequiredItem>,

    /// Worker threads (default: one per CPU)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    #[arg(long, default_value_t = 0)]
    pub start_seed: u64,

    /// Exclusive upper bound
    #[arg(long, default_value_t = SEED_SPACE)]
    pub end_seed: u64,

    /// Stop after this many results
    #[arg(long, value_name = "N")]
    pub limit: Option<u64>,

    /// Loot table JSON to use instead of the built-in desert pyramid table
    #[arg(long, value_name = "FILE")]
    pub loot_table: Option<PathBuf>,

    /// Continue from the checkpoint file instead of the arguments above
    #[arg(long, default_value_t = false)]
    pub resume: bool,

    #[arg(long, value_name = "FILE")]
    pub checkpoint: Option<PathBuf>,

    #[arg(long, value_name = "MS", default_value_t = PROGRESS_INTERVAL_MS)]
    pub progress_ms: u64,
}

impl Args {
    pub fn checkpoint_path(&self) -> PathBuf {
        self.checkpoint
            .clone()
            .or_else(default_checkpoint_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHECKPOINT_FILE))
    }

    /// Turn the command line (or the checkpoint it points at) into a request.
    /// Validation is left to the searcher.
    pub fn build_request(&self) -> Result<SearchRequest> {
        if self.resume {
            let path = self.checkpoint_path();
            let checkpoint = load_checkpoint(&path)?;
            tracing::info!(
                "Resuming from {} at seed {}",
                path.display(),
                checkpoint.next_seed
            );
            let request = checkpoint.to_request();
            return Ok(match self.threads {
                Some(threads) => request.with_workers(threads),
                None => request,
            });
        }

        let targets = match (&self.targets, self.chunk, self.area) {
            (Some(path), _, _) => {
                let text = fs::read_to_string(path)?;
                serde_json::from_str::<Vec<StructureTarget>>(&text)?
            }
            (None, Some(pos), _) => vec![self.with_requirements(StructureTarget::exact(pos))],
            (None, None, Some(rect)) => vec![self.with_requirements(StructureTarget::area(rect))],
            (None, None, None) => return Err(Error::NoTargets),
        };

        let mut request = SearchRequest::new(targets)
            .with_start_seed(self.start_seed)
            .with_end_seed(self.end_seed);
        if let Some(threads) = self.threads {
            request = request.with_workers(threads);
        }
        Ok(request)
    }

    fn with_requirements(&self, target: StructureTarget) -> StructureTarget {
        self.require
            .iter()
            .cloned()
            .fold(target, StructureTarget::with_required)
    }
}

fn parse_ints<const N: usize>(text: &str) -> std::result::Result<[i32; N], String> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {} comma-separated integers", N));
    }
    let mut values = [0i32; N];
    for (value, part) in values.iter_mut().zip(parts) {
        *value = part
            .parse()
            .map_err(|_| format!("'{}' is not an integer", part))?;
    }
    Ok(values)
}

fn parse_chunk(text: &str) -> std::result::Result<ChunkPos, String> {
    let [x, z] = parse_ints::<2>(text)?;
    Ok(ChunkPos::new(x, z))
}

fn parse_area(text: &str) -> std::result::Result<ChunkRect, String> {
    let [min_x, min_z, max_x, max_z] = parse_ints::<4>(text)?;
    ChunkRect::new(min_x, min_z, max_x, max_z).map_err(|e| e.to_string())
}

fn parse_requirement(text: &str) -> std::result::Result<RequiredItem, String> {
    text.parse().map_err(|e: Error| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Comparator, ContainerScope, TargetArea};

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("templeseed").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn inline_chunk_target() {
        let request = args(&[
            "--chunk",
            "-12,40",
            "--require",
            "diamond>=2",
            "--require",
            "minecraft:emerald==1@3",
            "--threads",
            "2",
            "--end-seed",
            "5000",
        ])
        .build_request()
        .unwrap();

        assert_eq!(request.worker_count, 2);
        assert_eq!((request.start_seed, request.end_seed), (0, 5000));
        assert_eq!(request.targets.len(), 1);
        let target = &request.targets[0];
        assert_eq!(target.area, TargetArea::Exact(ChunkPos::new(-12, 40)));
        assert_eq!(
            target.required,
            vec![
                RequiredItem::new(
                    "minecraft:diamond",
                    2,
                    Comparator::GreaterOrEqual,
                    ContainerScope::All,
                ),
                RequiredItem::new(
                    "minecraft:emerald",
                    1,
                    Comparator::Equal,
                    ContainerScope::Chest(3),
                ),
            ]
        );
        assert!(request.validate().is_ok());
    }

    #[test]
    fn inline_area_target() {
        let request = args(&["--area", "-5, -5, 5, 5", "--require", "gold_ingot<=3"])
            .build_request()
            .unwrap();
        let rect = ChunkRect::new(-5, -5, 5, 5).unwrap();
        assert_eq!(request.targets[0].area, TargetArea::Area(rect));
    }

    #[test]
    fn targets_file() {
        let dir = std::env::temp_dir().join(format!("templeseed-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("targets.json");
        fs::write(
            &path,
            r#"[
                {"area": {"exact": {"x": 0, "z": 0}},
                 "required": [{"name": "minecraft:diamond", "count": 1}]},
                {"area": {"area": {"min_x": -8, "min_z": -8, "max_x": 8, "max_z": 8}}}
            ]"#,
        )
        .unwrap();

        let request = args(&["--targets", path.to_str().unwrap()])
            .build_request()
            .unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(request.targets.len(), 2);
        assert_eq!(request.targets[0].required[0].comparator, Comparator::GreaterOrEqual);
        assert_eq!(request.targets[0].required[0].container, ContainerScope::All);
        assert!(!request.targets[1].has_constraints());
    }

    #[test]
    fn rejects_bad_arguments() {
        let parse = |argv: &[&str]| {
            Args::try_parse_from(std::iter::once("templeseed").chain(argv.iter().copied()))
        };
        assert!(parse(&["--chunk", "1"]).is_err());
        assert!(parse(&["--chunk", "1,x"]).is_err());
        assert!(parse(&["--area", "5,5,0,0"]).is_err());
        assert!(parse(&["--chunk", "0,0", "--require", "diamond"]).is_err());
        assert!(parse(&["--chunk", "0,0", "--require", "diamond>=1@7"]).is_err());
        assert!(parse(&["--chunk", "0,0", "--area", "0,0,1,1"]).is_err());

        assert!(matches!(args(&[]).build_request(), Err(Error::NoTargets)));
    }
}
