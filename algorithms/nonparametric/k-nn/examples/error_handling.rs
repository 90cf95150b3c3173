//! Example demonstrating error handling with the k-NN classifier.
//!
//! Shows the conditions the classifier reports instead of panicking, and how
//! `k` larger than the point set is clamped rather than rejected.

use hexknn_helpers::{L2Dist, LabeledPoint, PointSet};
use k_nn::{KnnClassifier, KnnError, classify};
use ndarray::array;

fn main() {
    println!("k-NN Classifier Error Handling Examples");
    println!("=======================================");

    // Example 1: Handle invalid k value
    println!("\n1. Handling invalid k value (k=0):");
    let points = PointSet::new(&[
        LabeledPoint::new(39.1, 18.7, "Adelie"),
        LabeledPoint::new(46.5, 17.9, "Chinstrap"),
    ]);

    match KnnClassifier::new(0, &points, L2Dist) {
        Ok(_) => println!("   Classifier created successfully"),
        Err(KnnError::InvalidK) => println!("   Caught expected error: {}", KnnError::InvalidK),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Example 2: Handle an empty point set
    println!("\n2. Handling an empty point set:");
    let empty: PointSet<&str, f64> = PointSet::new(&[]);
    match classify((40.0, 18.0), &empty, 3) {
        Ok(label) => println!("   Predicted label: {}", label),
        Err(KnnError::InsufficientData) => {
            println!("   Caught expected error: {}", KnnError::InsufficientData)
        }
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Example 3: k larger than the point set is clamped
    println!("\n3. k larger than the point set:");
    let bills = PointSet::new(&[
        LabeledPoint::new(40.0, 18.0, "Adelie"),
        LabeledPoint::new(42.0, 17.0, "Adelie"),
        LabeledPoint::new(50.0, 15.0, "Gentoo"),
    ]);
    for k in [1, 3, 10] {
        match classify((41.0, 17.5), &bills, k) {
            Ok(label) => println!("   k={:>2}: {}", k, label),
            Err(e) => println!("   k={:>2}: failed: {}", k, e),
        }
    }

    // Example 4: Error propagation in a function
    println!("\n4. Error propagation in functions:");

    fn nearest_species(points: &PointSet<&'static str, f64>) -> Result<String, KnnError> {
        let classifier = KnnClassifier::new(2, points, L2Dist)?;
        let neighbors = classifier.neighbors(array![44.0, 16.0].view())?;
        let first = neighbors.first().ok_or(KnnError::InsufficientData)?;
        Ok(format!("{} at {:.2} mm", first.label, first.distance))
    }

    match nearest_species(&bills) {
        Ok(result) => println!("   Nearest: {}", result),
        Err(e) => println!("   Lookup failed: {}", e),
    }

    // Example 5: Non-finite query coordinates
    println!("\n5. Non-finite query:");
    match classify((f64::NAN, 17.0), &bills, 1) {
        Err(KnnError::InvalidDistance) => {
            println!("   Caught expected error: {}", KnnError::InvalidDistance)
        }
        other => println!("   Unexpected result: {:?}", other),
    }
}
