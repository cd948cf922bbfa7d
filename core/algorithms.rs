/*!
The fixed set of classifiers the dashboard offers. The table is defined once at compile time and never changes.
*/

use serde_json::{json, Value};

#[derive(Debug, PartialEq)]
pub struct Algorithm {
	pub name: &'static str,
	pub abbreviation: &'static str,
	pub description: &'static str,
}

pub static ALGORITHMS: [Algorithm; 6] = [
	Algorithm {
		name: "K-Nearest Neighbors",
		abbreviation: "KNN",
		description: "Classification from the nearest neighbors in feature space",
	},
	Algorithm {
		name: "Random Forest",
		abbreviation: "RF",
		description: "Ensemble of decision trees",
	},
	Algorithm {
		name: "Naive Bayes",
		abbreviation: "NB",
		description: "Probabilistic bayesian classifier",
	},
	Algorithm {
		name: "Support Vector Machine",
		abbreviation: "SVM",
		description: "Maximum margin classifier",
	},
	Algorithm {
		name: "Multi-Layer Perceptron",
		abbreviation: "MLP",
		description: "Feed forward neural network",
	},
	Algorithm {
		name: "Gaussian Process Classifier",
		abbreviation: "GPC",
		description: "Gaussian process classifier",
	},
];

impl Algorithm {
	/// The default hyperparameters, keyed by their scikit-learn names.
	pub fn hyperparameters(&self) -> serde_json::Map<String, Value> {
		let value = match self.abbreviation {
			"KNN" => json!({ "n_neighbors": 5, "weights": "uniform", "metric": "minkowski" }),
			"RF" => json!({ "n_estimators": 100, "max_depth": 10, "min_samples_split": 2 }),
			"NB" => json!({ "var_smoothing": 1e-9 }),
			"SVM" => json!({ "C": 1.0, "kernel": "rbf", "gamma": "scale" }),
			"MLP" => json!({ "hidden_layer_sizes": [100], "activation": "relu", "solver": "adam" }),
			"GPC" => json!({ "kernel": "RBF", "optimizer": "fmin_l_bfgs_b" }),
			_ => json!({}),
		};
		match value {
			Value::Object(map) => map,
			_ => serde_json::Map::new(),
		}
	}
}

#[derive(serde::Serialize)]
pub struct AlgorithmDescriptor {
	pub name: &'static str,
	pub abbreviation: &'static str,
	pub description: &'static str,
	pub hyperparameters: serde_json::Map<String, Value>,
}

impl From<&Algorithm> for AlgorithmDescriptor {
	fn from(algorithm: &Algorithm) -> Self {
		Self {
			name: algorithm.name,
			abbreviation: algorithm.abbreviation,
			description: algorithm.description,
			hyperparameters: algorithm.hyperparameters(),
		}
	}
}

pub fn find(abbreviation: &str) -> Option<&'static Algorithm> {
	ALGORITHMS
		.iter()
		.find(|algorithm| algorithm.abbreviation == abbreviation)
}

/// One entry of the training queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
	Known(&'static Algorithm),
	/// An abbreviation that names no algorithm. It still occupies its place in the queue.
	Unknown(String),
}

/// The algorithms a training session will run, in the order they were requested.
#[derive(Debug)]
pub struct Selection {
	pub algorithms: Vec<&'static Algorithm>,
	/// Requested abbreviations that name no known algorithm.
	pub skipped: Vec<String>,
	/// Known and unknown entries interleaved in request order.
	pub slots: Vec<Slot>,
}

/// Resolve requested abbreviations against the table. Duplicates keep their first position and unknown abbreviations are set aside rather than rejected.
pub fn resolve_selection<S: AsRef<str>>(requested: &[S]) -> Selection {
	let mut algorithms: Vec<&'static Algorithm> = Vec::new();
	let mut skipped = Vec::new();
	let mut slots = Vec::new();
	for abbreviation in requested {
		let abbreviation = abbreviation.as_ref();
		match find(abbreviation) {
			Some(algorithm) => {
				if !algorithms.iter().any(|a| std::ptr::eq(*a, algorithm)) {
					algorithms.push(algorithm);
					slots.push(Slot::Known(algorithm));
				}
			}
			None => {
				skipped.push(abbreviation.to_owned());
				slots.push(Slot::Unknown(abbreviation.to_owned()));
			}
		}
	}
	Selection {
		algorithms,
		skipped,
		slots,
	}
}

#[test]
fn test_find() {
	assert_eq!(find("RF").map(|a| a.name), Some("Random Forest"));
	assert!(find("rf").is_none());
	assert!(find("XGB").is_none());
}

#[test]
fn test_resolve_selection() {
	let selection = resolve_selection(&["SVM", "KNN", "XGB", "SVM", "NB"]);
	let abbreviations: Vec<_> = selection
		.algorithms
		.iter()
		.map(|algorithm| algorithm.abbreviation)
		.collect();
	assert_eq!(abbreviations, vec!["SVM", "KNN", "NB"]);
	assert_eq!(selection.skipped, vec!["XGB".to_owned()]);
	assert_eq!(
		selection.slots,
		vec![
			Slot::Known(find("SVM").unwrap()),
			Slot::Known(find("KNN").unwrap()),
			Slot::Unknown("XGB".to_owned()),
			Slot::Known(find("NB").unwrap()),
		]
	);
}

#[test]
fn test_hyperparameters() {
	for algorithm in ALGORITHMS.iter() {
		assert!(!algorithm.hyperparameters().is_empty());
	}
	let rf = find("RF").unwrap().hyperparameters();
	assert_eq!(rf["n_estimators"], 100);
	assert_eq!(rf["max_depth"], 10);
}
