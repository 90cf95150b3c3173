// A small demo: animate k over a slice of the penguin measurements and
// print how the decision field splits between species at each step.
use hexknn::{AnimationTarget, RawRecord, Session, VisualizerConfig, load_points};
use std::error::Error;

const PENGUINS: &[(&str, Option<f64>, Option<f64>)] = &[
    ("Adelie", Some(39.1), Some(18.7)),
    ("Adelie", Some(39.5), Some(17.4)),
    ("Adelie", Some(40.3), Some(18.0)),
    ("Adelie", None, None),
    ("Adelie", Some(36.7), Some(19.3)),
    ("Adelie", Some(39.3), Some(20.6)),
    ("Adelie", Some(38.9), Some(17.8)),
    ("Adelie", Some(39.2), Some(19.6)),
    ("Adelie", Some(34.1), Some(18.1)),
    ("Adelie", Some(42.0), Some(20.2)),
    ("Gentoo", Some(46.1), Some(13.2)),
    ("Gentoo", Some(50.0), Some(16.3)),
    ("Gentoo", Some(48.7), Some(14.1)),
    ("Gentoo", Some(50.0), Some(15.2)),
    ("Gentoo", Some(47.6), Some(14.5)),
    ("Gentoo", Some(46.5), Some(13.5)),
    ("Gentoo", Some(45.4), Some(14.6)),
    ("Gentoo", Some(46.7), Some(15.3)),
    ("Gentoo", Some(43.3), Some(13.4)),
    ("Gentoo", Some(46.8), Some(15.4)),
    ("Chinstrap", Some(46.5), Some(17.9)),
    ("Chinstrap", Some(50.0), Some(19.5)),
    ("Chinstrap", Some(51.3), Some(19.2)),
    ("Chinstrap", Some(45.4), Some(18.7)),
    ("Chinstrap", Some(52.7), Some(19.8)),
    ("Chinstrap", Some(45.2), Some(17.8)),
    ("Chinstrap", Some(46.1), Some(18.2)),
    ("Chinstrap", Some(51.3), Some(18.2)),
    ("Chinstrap", Some(46.0), Some(18.9)),
    ("Chinstrap", Some(51.3), Some(19.9)),
];

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let records = PENGUINS.iter().map(|&(species, x, y)| RawRecord {
        species: Some(species.to_string()),
        bill_length_mm: x,
        bill_depth_mm: y,
    });
    let (points, skipped) = load_points(records);
    println!("hexknn demo: {} points loaded, {} skipped", points.len(), skipped);

    let config = VisualizerConfig::new(1)
        .with_radius(1.0)
        .with_target(AnimationTarget::K);
    let mut session = Session::new(points, config)?;
    println!("grid: {} cells", session.grid().len());

    session.flush()?;
    session.play();
    loop {
        let fields = session.fields();
        let shares: Vec<String> = fields
            .decision
            .label_counts()
            .iter()
            .map(|(label, n)| format!("{label}={n}"))
            .collect();
        println!(
            "k={:>3}  occupied={:>3}  {}",
            fields.k,
            fields.density.len(),
            shares.join(" ")
        );
        if session.counter() >= 30 {
            break;
        }
        session.frame()?;
    }
    Ok(())
}
