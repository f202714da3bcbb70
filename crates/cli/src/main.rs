use anyhow::{Context, Result};
use atlas_annotation::{nearest_shape, properties, Adjacency, Aggregator, Annotation};
use atlas_search::{AcronymSearch, RegionSearch, SearchConfig};
use atlas_taxonomy::{RegionId, TaxonomyConfig, TaxonomyIndex};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

mod flags;
mod output;

use flags::{GroupsPreset, PathLabelFlag, PatternPreset, PredicateFlag};
use output::{
    emit, summaries, summary_lines, ClassifyOutput, GroupSummary, StatusCounts, SupershapeOutput,
};

#[derive(Parser)]
#[command(name = "atlas")]
#[command(about = "Navigate brain atlas taxonomies and analyse region annotations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Taxonomy JSON (array of roots, single root, or API envelope)
    #[arg(long, global = true)]
    taxonomy: Option<PathBuf>,

    /// TOML file with a taxonomy configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Group vocabulary preset (overrides the config file)
    #[arg(long, global = true, value_enum)]
    groups: Option<GroupsPreset>,

    /// Print JSON on stdout (implies --quiet)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the taxonomy as an indented outline
    Tree(TreeArgs),

    /// Show one region
    Lookup(IdArgs),

    /// Ancestors of a region, most general first
    Ancestors(IdArgs),

    /// Direct children of a region
    Children(IdArgs),

    /// All children of a region's parent
    Siblings(IdArgs),

    /// Ancestor path of a region
    Path(PathArgs),

    /// Group of a region, members of a group, or all groups
    Group(GroupArgs),

    /// Regions at a given depth
    Level(LevelArgs),

    /// Regions whose acronym matches a pattern preset
    Patterns(PatternsArgs),

    /// Fuzzy search over region names
    Search(SearchArgs),

    /// Fuzzy search over region acronyms
    Acronym(AcronymArgs),

    /// Union of annotated shapes below a region
    Supershape(AnnotatedIdArgs),

    /// Annotated / aggregatable / unreachable partition of the taxonomy
    Classify(AnnotationArgs),

    /// Topological relations between annotated shapes
    Adjacency(AdjacencyArgs),

    /// Closest shape in an annotation to a shape from another one
    Nearest(NearestArgs),

    /// Measurements of one annotated shape
    Properties(ShapeArgs),
}

#[derive(Args)]
struct IdArgs {
    id: RegionId,
}

#[derive(Args)]
struct TreeArgs {
    /// Only the subtree below this region
    #[arg(long)]
    id: Option<RegionId>,

    /// Only the subtrees of this group
    #[arg(long, conflicts_with = "id")]
    group: Option<String>,
}

#[derive(Args)]
struct PathArgs {
    id: RegionId,

    #[arg(long, value_enum, default_value = "name")]
    label: PathLabelFlag,

    #[arg(long, default_value = " / ")]
    separator: String,
}

#[derive(Args)]
struct GroupArgs {
    /// Region to classify
    id: Option<RegionId>,

    /// List the members of this group instead
    #[arg(long, conflicts_with = "id")]
    members: Option<String>,
}

#[derive(Args)]
struct LevelArgs {
    level: usize,
}

#[derive(Args)]
struct PatternsArgs {
    #[arg(long, value_enum, default_value = "cortical")]
    preset: PatternPreset,
}

#[derive(Args)]
struct SearchArgs {
    query: String,

    /// Substring matching instead of whole-name similarity
    #[arg(long)]
    partial: bool,

    /// Maximum number of hits (unbounded by default)
    #[arg(long)]
    limit: Option<usize>,

    /// Restrict to the descendants of this region
    #[arg(long)]
    within: Option<RegionId>,

    /// Minimum score (0-100)
    #[arg(long)]
    cutoff: Option<f64>,

    /// Keep names containing "of" even when the query does not
    #[arg(long)]
    keep_of: bool,
}

#[derive(Args)]
struct AcronymArgs {
    query: String,

    #[arg(long, default_value_t = 10)]
    limit: usize,
}

#[derive(Args)]
struct AnnotationArgs {
    /// Annotation JSON: array of {"id", "rings"} records
    #[arg(long)]
    annotation: PathBuf,
}

#[derive(Args)]
struct AnnotatedIdArgs {
    id: RegionId,

    #[command(flatten)]
    source: AnnotationArgs,
}

#[derive(Args)]
struct AdjacencyArgs {
    #[command(flatten)]
    source: AnnotationArgs,

    /// Only this predicate
    #[arg(long, value_enum)]
    predicate: Option<PredicateFlag>,

    /// Deduplicate (i, j) / (j, i) pairs
    #[arg(long)]
    undirected: bool,
}

#[derive(Args)]
struct NearestArgs {
    /// Region whose shape is matched
    id: RegionId,

    /// Annotation holding the shape to match
    #[arg(long)]
    from: PathBuf,

    /// Annotation holding the candidates
    #[arg(long)]
    annotation: PathBuf,
}

#[derive(Args)]
struct ShapeArgs {
    id: RegionId,

    #[command(flatten)]
    source: AnnotationArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || cli.json {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match &cli.command {
        Commands::Tree(args) => run_tree(&cli, args),
        Commands::Lookup(args) => run_lookup(&cli, args),
        Commands::Ancestors(args) => {
            let index = load_index(&cli)?;
            let ids = index.ancestor_ids(args.id)?;
            run_listing(&cli, &index, &ids)
        }
        Commands::Children(args) => {
            let index = load_index(&cli)?;
            let ids = index.children_ids(args.id)?;
            run_listing(&cli, &index, &ids)
        }
        Commands::Siblings(args) => {
            let index = load_index(&cli)?;
            let ids = index.sibling_ids(args.id)?;
            run_listing(&cli, &index, &ids)
        }
        Commands::Path(args) => run_path(&cli, args),
        Commands::Group(args) => run_group(&cli, args),
        Commands::Level(args) => {
            let index = load_index(&cli)?;
            let ids = index.ids_at_level(args.level);
            run_listing(&cli, &index, &ids)
        }
        Commands::Patterns(args) => run_patterns(&cli, args),
        Commands::Search(args) => run_search(&cli, args),
        Commands::Acronym(args) => run_acronym(&cli, args),
        Commands::Supershape(args) => run_supershape(&cli, args),
        Commands::Classify(args) => run_classify(&cli, args),
        Commands::Adjacency(args) => run_adjacency(&cli, args),
        Commands::Nearest(args) => run_nearest(&cli, args),
        Commands::Properties(args) => run_properties(&cli, args),
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_config(cli: &Cli) -> Result<TaxonomyConfig> {
    let mut config = match &cli.config {
        Some(path) => TaxonomyConfig::from_toml_str(&read_file(path)?)
            .with_context(|| format!("Invalid taxonomy config {}", path.display()))?,
        None => TaxonomyConfig::default(),
    };
    if let Some(preset) = cli.groups {
        config.groups = preset.as_domain();
    }
    Ok(config)
}

fn load_index(cli: &Cli) -> Result<TaxonomyIndex> {
    let path = cli
        .taxonomy
        .as_deref()
        .context("This command needs --taxonomy <FILE>")?;
    let config = load_config(cli)?;
    TaxonomyIndex::from_json(&read_file(path)?, config)
        .with_context(|| format!("Failed to build taxonomy from {}", path.display()))
}

fn load_annotation(path: &Path) -> Result<Annotation> {
    let annotation = Annotation::from_json(&read_file(path)?)
        .with_context(|| format!("Failed to load annotation {}", path.display()))?;
    log::info!("Loaded {} annotated regions from {}", annotation.len(), path.display());
    Ok(annotation)
}

fn run_tree(cli: &Cli, args: &TreeArgs) -> Result<()> {
    let index = load_index(cli)?;

    if cli.json {
        let ids = match (&args.id, &args.group) {
            (Some(id), _) => {
                let mut ids = vec![*id];
                ids.extend(index.subtree_ids(*id)?);
                ids
            }
            (None, Some(group)) => index.group_members(group),
            (None, None) => index.ids().to_vec(),
        };
        let nodes = ids
            .iter()
            .map(|id| Ok(index.lookup(*id)?.clone()))
            .collect::<Result<Vec<_>>>()?;
        return emit(true, &nodes, |_| String::new());
    }

    let outline = match (&args.id, &args.group) {
        (Some(id), _) => index.render_subtree(*id)?,
        (None, Some(group)) => index.render_group(group),
        (None, None) => index.render_outline(),
    };
    print!("{}", outline);
    Ok(())
}

fn run_lookup(cli: &Cli, args: &IdArgs) -> Result<()> {
    let index = load_index(cli)?;
    let node = index.lookup(args.id)?;
    let group = index.group_of(args.id)?;
    emit(cli.json, node, |node| output::node_details(node, group))
}

fn run_listing(cli: &Cli, index: &TaxonomyIndex, ids: &[RegionId]) -> Result<()> {
    let nodes = summaries(index, ids)?;
    emit(cli.json, &nodes, |nodes| summary_lines(nodes))
}

fn run_path(cli: &Cli, args: &PathArgs) -> Result<()> {
    #[derive(Serialize)]
    struct PathOutput {
        id: RegionId,
        path: String,
    }

    let index = load_index(cli)?;
    let path = index.full_path(args.id, args.label.as_domain(), &args.separator)?;
    emit(cli.json, &PathOutput { id: args.id, path }, |out| out.path.clone())
}

fn run_group(cli: &Cli, args: &GroupArgs) -> Result<()> {
    #[derive(Serialize)]
    struct GroupOf {
        id: RegionId,
        group: Option<String>,
    }

    let index = load_index(cli)?;

    if let Some(name) = &args.members {
        let nodes = summaries(&index, &index.group_members(name))?;
        return emit(cli.json, &nodes, |nodes| summary_lines(nodes));
    }

    if let Some(id) = args.id {
        let group = index.group_of(id)?.map(str::to_string);
        return emit(cli.json, &GroupOf { id, group }, |out| {
            out.group.clone().unwrap_or_else(|| "-".to_string())
        });
    }

    let groups: Vec<GroupSummary> = index
        .group_names()
        .map(|name| GroupSummary {
            name: name.to_string(),
            roots: index.group_roots(name).to_vec(),
            members: index.group_members(name).len(),
        })
        .collect();
    emit(cli.json, &groups, |groups| {
        groups
            .iter()
            .map(|g| format!("{:<8} roots [{}] members {}", g.name, output::id_list(&g.roots), g.members))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn run_patterns(cli: &Cli, args: &PatternsArgs) -> Result<()> {
    let index = load_index(cli)?;
    let matched = index.ids_matching_acronyms(&args.preset.as_domain());
    emit(cli.json, &matched, |matched| {
        matched
            .iter()
            .map(|(pattern, ids)| format!("{}: {}", pattern, output::id_list(ids)))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn run_search(cli: &Cli, args: &SearchArgs) -> Result<()> {
    let index = load_index(cli)?;

    let mut config = SearchConfig::default();
    if let Some(cutoff) = args.cutoff {
        config.cutoff = cutoff;
    }
    config.suppress_of = !args.keep_of;

    let search = RegionSearch::with_config(&index, config);
    let hits = match args.within {
        Some(root) => search.search_within(root, &args.query, args.partial, args.limit)?,
        None => search.search(&args.query, args.partial, args.limit)?,
    };

    if hits.is_empty() {
        log::info!("No region name matches '{}'", args.query);
    }
    emit(cli.json, &hits, |hits| {
        hits.iter()
            .map(|hit| format!("{:6.2}  {}  {}", hit.score, hit.id, hit.name))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn run_acronym(cli: &Cli, args: &AcronymArgs) -> Result<()> {
    #[derive(Serialize)]
    struct AcronymHit {
        id: RegionId,
        acronym: String,
        score: f32,
    }

    let index = load_index(cli)?;
    let mut search = AcronymSearch::new();
    let hits = search
        .search(&args.query, &index, args.limit)
        .into_iter()
        .map(|(id, score)| {
            Ok(AcronymHit {
                id,
                acronym: index.lookup(id)?.acronym.clone(),
                score,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    emit(cli.json, &hits, |hits| {
        hits.iter()
            .map(|hit| format!("{:.3}  {}  {}", hit.score, hit.id, hit.acronym))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn run_supershape(cli: &Cli, args: &AnnotatedIdArgs) -> Result<()> {
    let index = load_index(cli)?;
    let annotation = load_annotation(&args.source.annotation)?;
    let aggregator = Aggregator::new(&index, &annotation)?;

    let supershape = aggregator.supershape(args.id)?;
    let out = SupershapeOutput::new(args.id, supershape.shape.as_ref(), supershape.contributors);
    emit(cli.json, &out, |out| {
        if out.rings.is_none() {
            format!("{}: nothing annotated below", out.id)
        } else if out.contributors.is_empty() {
            format!("{}: annotated directly, {} component(s)", out.id, out.components)
        } else {
            format!(
                "{}: {} component(s) from [{}]",
                out.id,
                out.components,
                output::id_list(&out.contributors)
            )
        }
    })
}

fn run_classify(cli: &Cli, args: &AnnotationArgs) -> Result<()> {
    let index = load_index(cli)?;
    let annotation = load_annotation(&args.annotation)?;
    let aggregator = Aggregator::new(&index, &annotation)?;

    let out = ClassifyOutput {
        counts: StatusCounts::from(&aggregator.classify()),
        reachable_parents: aggregator.reachable_parents(),
        nonreachable: aggregator.nonreachable(),
        nested: aggregator.nested_annotations(),
    };
    emit(cli.json, &out, output::classify_text)
}

fn run_adjacency(cli: &Cli, args: &AdjacencyArgs) -> Result<()> {
    let annotation = load_annotation(&args.source.annotation)?;
    let adjacency = Adjacency::compute(&annotation);

    let predicates: Vec<_> = match args.predicate {
        Some(flag) => vec![flag.as_domain()],
        None => atlas_annotation::Predicate::ALL.to_vec(),
    };
    let edges: BTreeMap<&str, Vec<(RegionId, RegionId)>> = predicates
        .into_iter()
        .map(|predicate| {
            let edges = if args.undirected {
                adjacency.undirected(predicate)
            } else {
                adjacency.edges(predicate).to_vec()
            };
            (predicate.name(), edges)
        })
        .collect();

    emit(cli.json, &edges, |edges| {
        edges
            .iter()
            .map(|(name, list)| format!("{}: {}", name, output::edge_list(list)))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn run_nearest(cli: &Cli, args: &NearestArgs) -> Result<()> {
    let source = load_annotation(&args.from)?;
    let candidates = load_annotation(&args.annotation)?;
    let shape = source
        .get(args.id)
        .with_context(|| format!("Region {} is not drawn in {}", args.id, args.from.display()))?;

    let found = nearest_shape(shape, candidates.iter());
    emit(cli.json, &found, |found| match found.id {
        Some(id) => format!("{} (distance {:.3})", id, found.distance),
        None => "no match".to_string(),
    })
}

fn run_properties(cli: &Cli, args: &ShapeArgs) -> Result<()> {
    let annotation = load_annotation(&args.source.annotation)?;
    let shape = annotation.get(args.id).with_context(|| {
        format!(
            "Region {} is not drawn in {}",
            args.id,
            args.source.annotation.display()
        )
    })?;

    let props = properties(shape);
    emit(cli.json, &props, |props| {
        let point = props
            .interior_point
            .map_or_else(|| "-".to_string(), |[x, y]| format!("({:.3}, {:.3})", x, y));
        format!(
            "interior point: {}\narea:           {:.3}\nperimeter:      {:.3}\ncomponents:     {}\norientation:    {:.2} deg",
            point, props.area, props.perimeter, props.components, props.orientation
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use output::NodeSummary;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn node_summary_from_lookup() {
        let index = TaxonomyIndex::from_json(
            r#"[{"id": 1, "acronym": "A", "name": "Root", "color_hex_triplet": "ff0000"}]"#,
            TaxonomyConfig::default(),
        )
        .unwrap();
        let summary = NodeSummary::from(index.lookup(1).unwrap());
        assert_eq!(summary_lines(&[summary]), "1 (A) Root");
    }
}
