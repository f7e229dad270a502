mod geojson;
mod provenance;
mod summary;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use geo::Simplify;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use provenance::Payload;

use ortho::api::{
    orthogonalize_all, polygon_from_geo, polygon_to_geo, BatchStats, Frame, Geometry,
    MultiPolygon, OrthoCfg, OrthoError, OrthoResult, Polygon,
};

#[derive(Parser)]
#[command(name = "ortho-cli")]
#[command(about = "Square up building footprints in GeoJSON files")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Orthogonalize a GeoJSON FeatureCollection
    Run(RunArgs),
    /// Print part counts and mean overlap per verdict from a summary table
    Summarize {
        #[arg(long)]
        summary: PathBuf,
    },
    /// Print version, git revision and the default config as JSON
    Report,
}

#[derive(Args, Serialize)]
struct RunArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    out: PathBuf,
    /// Per-part summary table (.csv or .parquet)
    #[arg(long)]
    summary: Option<PathBuf>,
    /// JSON file with config fields; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Working frame: planar or web-mercator
    #[arg(long)]
    frame: Option<Frame>,
    /// Douglas–Peucker tolerance applied before orthogonalizing
    #[arg(long)]
    simplify: Option<f64>,
    /// Douglas–Peucker tolerance applied to the written geometries
    #[arg(long)]
    post_simplify: Option<f64>,
    /// Process only slice k of the features
    #[arg(long)]
    slice: Option<usize>,
    #[arg(long, default_value_t = 50_000)]
    slice_size: usize,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run(args) => run(&args),
        Action::Summarize { summary } => summarize(&summary),
        Action::Report => report(),
    }
}

fn load_cfg(path: Option<&Path>) -> Result<OrthoCfg> {
    let Some(path) = path else {
        return Ok(OrthoCfg::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Douglas–Peucker per part; every ring is re-validated.
fn simplify_geometry(g: &Geometry, eps: f64) -> Result<Geometry, OrthoError> {
    let part = |p: &Polygon| polygon_from_geo(&polygon_to_geo(p).simplify(&eps));
    Ok(match g {
        Geometry::Polygon(p) => Geometry::Polygon(part(p)?),
        Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(MultiPolygon(
            mp.0.iter().map(part).collect::<Result<Vec<_>, _>>()?,
        )),
    })
}

/// Properties written on every orthogonalized feature.
fn ortho_props(res: &OrthoResult) -> Map<String, Value> {
    let accepted = !res.parts.is_empty() && res.accepted_parts() == res.parts.len();
    let perc_change = res
        .parts
        .iter()
        .filter_map(|p| p.overlap_ratio())
        .reduce(f64::min)
        .map(|r| (r * 1000.0).round() / 1000.0);
    let mut props = Map::new();
    props.insert("ortho_accepted".into(), json!(accepted));
    props.insert("perc_change".into(), json!(perc_change));
    props
}

fn run(args: &RunArgs) -> Result<()> {
    let mut cfg = load_cfg(args.config.as_deref())?;
    if let Some(frame) = args.frame {
        cfg.frame = frame;
    }
    cfg.validate()?;
    tracing::info!(
        input = %args.input.display(),
        out = %args.out.display(),
        frame = ?cfg.frame,
        "run"
    );

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let mut fc = geojson::FeatureCollection::parse(&text)
        .with_context(|| format!("loading {}", args.input.display()))?;
    if let Some(k) = args.slice {
        fc.slice(k, args.slice_size);
        tracing::info!(slice = k, features = fc.features().len(), "input_slice");
    }

    // Features that do not decode are passed through unchanged.
    let mut geometries: Vec<Geometry> = Vec::new();
    let mut slots: Vec<Option<usize>> = Vec::with_capacity(fc.features().len());
    for (i, feature) in fc.features().iter().enumerate() {
        let decoded = geojson::feature_geometry(feature).and_then(|g| match args.simplify {
            Some(eps) => Ok(simplify_geometry(&g, eps)?),
            None => Ok(g),
        });
        match decoded {
            Ok(g) => {
                slots.push(Some(geometries.len()));
                geometries.push(g);
            }
            Err(err) => {
                tracing::warn!(
                    feature = fc.offset() + i,
                    error = %format!("{err:#}"),
                    "passthrough"
                );
                slots.push(None);
            }
        }
    }

    let results = orthogonalize_all(&geometries, &cfg);
    let stats = BatchStats::from_results(&results);

    for (feature, slot) in fc.features_mut().iter_mut().zip(&slots) {
        let Some(k) = *slot else { continue };
        let res = &results[k];
        let mut out = res.geometry();
        if let Some(eps) = args.post_simplify {
            match simplify_geometry(&out, eps) {
                Ok(simplified) => out = simplified,
                Err(err) => tracing::warn!(error = %err, "post-simplify skipped"),
            }
        }
        geojson::rewrite_feature(feature, &out, ortho_props(res));
    }

    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&args.out, serde_json::to_vec(&fc.to_value())?)
        .with_context(|| format!("writing {}", args.out.display()))?;

    let params = json!({
        "args": serde_json::to_value(args)?,
        "cfg": serde_json::to_value(cfg)?,
    });
    let mut payload = Payload::new(params)
        .input(&args.input)
        .stats(json!({
            "features": fc.features().len(),
            "geometries": stats.geometries,
            "parts": stats.parts,
            "accepted": stats.accepted,
            "rejected": stats.rejected,
            "failed": stats.failed,
        }));
    if let Some(path) = &args.summary {
        let offset = fc.offset();
        let rows = summary::part_rows(
            slots
                .iter()
                .enumerate()
                .filter_map(|(i, slot)| slot.map(|k| (offset + i, &results[k]))),
        );
        summary::write(path, &rows)?;
        payload = payload.output(path);
    }
    provenance::write_sidecar(&args.out, payload)?;
    Ok(())
}

fn summarize(path: &Path) -> Result<()> {
    let df = summary::verdict_table(path)?;
    println!("{df}");
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "ortho_version": ortho::VERSION,
        "code_rev": provenance::code_rev(),
        "default_cfg": OrthoCfg::default(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const INPUT: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "noisy"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[10,0.1],[10.1,5],[0,4.9],[0,0]]]}},
            {"type": "Feature", "properties": {"name": "triangle"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[10,0],[0,10],[0,0]]]}},
            {"type": "Feature", "properties": {"name": "open"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1]]]}},
            {"type": "Feature", "properties": {"name": "point"},
             "geometry": {"type": "Point", "coordinates": [1, 2]}}
        ]
    }"#;

    fn args(dir: &Path) -> RunArgs {
        let input = dir.join("raw.geojson");
        fs::write(&input, INPUT).unwrap();
        RunArgs {
            input,
            out: dir.join("out/ortho.geojson"),
            summary: Some(dir.join("out/ortho.csv")),
            config: None,
            frame: None,
            simplify: None,
            post_simplify: None,
            slice: None,
            slice_size: 50_000,
        }
    }

    fn read(path: &Path) -> Value {
        serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn run_rewrites_accepted_and_passes_through_the_rest() {
        let dir = tempdir().unwrap();
        let a = args(dir.path());
        run(&a).unwrap();

        let out = read(&a.out);
        let input: Value = serde_json::from_str(INPUT).unwrap();
        let features = out["features"].as_array().unwrap();
        assert_eq!(features.len(), 4);

        let noisy = &features[0];
        assert_eq!(noisy["properties"]["name"], "noisy");
        assert_eq!(noisy["properties"]["ortho_accepted"], true);
        assert!(noisy["properties"]["perc_change"].as_f64().unwrap() >= 0.95);
        let ring = noisy["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);

        // Rolled back: original coordinates, flagged as not accepted.
        let triangle = &features[1];
        assert_eq!(triangle["properties"]["ortho_accepted"], false);
        let tri = geojson::geometry_from_value(&triangle["geometry"]).unwrap();
        assert_eq!(tri, geojson::geometry_from_value(&input["features"][1]["geometry"]).unwrap());

        // Undecodable features are untouched.
        assert_eq!(features[2], input["features"][2]);
        assert_eq!(features[3], input["features"][3]);

        let prov = read(&a.out.with_file_name("ortho.provenance.json"));
        assert_eq!(prov["stats"]["geometries"], 2);
        assert_eq!(prov["stats"]["accepted"], 1);
        assert_eq!(prov["params"]["cfg"]["min_overlap"], 0.95);

        let table = summary::verdict_table(a.summary.as_deref().unwrap()).unwrap();
        assert_eq!(table.height(), 2);
    }

    #[test]
    fn config_file_and_frame_flag_are_applied() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("cfg.json");
        fs::write(&cfg_path, r#"{"min_overlap": 0.5}"#).unwrap();
        let cfg = load_cfg(Some(&cfg_path)).unwrap();
        assert_eq!(cfg.min_overlap, 0.5);
        assert_eq!(cfg.align_max_angle_change, OrthoCfg::default().align_max_angle_change);

        fs::write(&cfg_path, r#"{"min_overlap": 2.0}"#).unwrap();
        let mut a = args(dir.path());
        a.config = Some(cfg_path);
        a.frame = Some(Frame::Planar);
        let err = run(&a).unwrap_err();
        assert!(err.to_string().contains("invalid orthogonalizer config"), "{err:#}");
    }

    #[test]
    fn slice_restricts_features_and_keeps_indices() {
        let dir = tempdir().unwrap();
        let mut a = args(dir.path());
        a.slice = Some(1);
        a.slice_size = 1;
        run(&a).unwrap();
        let out = read(&a.out);
        assert_eq!(out["features"].as_array().unwrap().len(), 1);
        assert_eq!(out["features"][0]["properties"]["name"], "triangle");
    }

    #[test]
    fn simplify_drops_collinear_vertices_and_revalidates() {
        let square = Polygon::new(
            vec![
                ortho::Point::new(0.0, 0.0),
                ortho::Point::new(5.0, 0.0),
                ortho::Point::new(10.0, 0.0),
                ortho::Point::new(10.0, 10.0),
                ortho::Point::new(0.0, 10.0),
                ortho::Point::new(0.0, 0.0),
            ],
            vec![],
        )
        .unwrap();
        match simplify_geometry(&Geometry::Polygon(square.clone()), 1e-6).unwrap() {
            Geometry::Polygon(p) => assert_eq!(p.exterior().len(), 5),
            Geometry::MultiPolygon(_) => panic!("kind changed"),
        }
        // A tolerance larger than the footprint collapses the ring.
        let err = simplify_geometry(&Geometry::Polygon(square), 100.0).unwrap_err();
        assert!(matches!(err, OrthoError::MalformedRing { .. }));
    }

    #[test]
    fn perc_change_is_rounded_minimum_over_parts() {
        let poly = |x0: f64| {
            Polygon::new(
                vec![
                    ortho::Point::new(x0, 0.0),
                    ortho::Point::new(x0 + 4.0, 0.1),
                    ortho::Point::new(x0 + 4.1, 3.0),
                    ortho::Point::new(x0, 2.9),
                    ortho::Point::new(x0, 0.0),
                ],
                vec![],
            )
            .unwrap()
        };
        let g = Geometry::MultiPolygon(MultiPolygon(vec![poly(0.0), poly(10.0)]));
        let res = ortho::orthogonalize(&g, &OrthoCfg::default());
        let props = ortho_props(&res);
        assert_eq!(props["ortho_accepted"], true);
        let pc = props["perc_change"].as_f64().unwrap();
        assert_eq!(pc, (pc * 1000.0).round() / 1000.0);
        assert!(pc > 0.9 && pc <= 1.0);
    }
}
