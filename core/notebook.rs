use serde_json::{json, Value};
use std::time::Duration;

pub const NOTEBOOK_FILENAME: &str = "bank_marketing_analysis.ipynb";

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
	Markdown,
	Code,
}

#[derive(Debug, serde::Serialize)]
pub struct Cell {
	pub cell_type: CellType,
	pub source: Vec<&'static str>,
}

/// The subset of the ipynb format the dashboard renders.
#[derive(Debug, serde::Serialize)]
pub struct Notebook {
	pub cells: Vec<Cell>,
	pub metadata: Value,
	pub nbformat: u32,
	pub nbformat_minor: u32,
}

#[derive(Debug, serde::Serialize)]
pub struct GeneratedNotebook {
	pub notebook: Notebook,
	pub filename: &'static str,
	pub size: &'static str,
	pub cells_count: u64,
}

pub async fn generate(delay: Duration) -> GeneratedNotebook {
	tokio::time::sleep(delay).await;
	GeneratedNotebook {
		notebook: notebook(),
		filename: NOTEBOOK_FILENAME,
		size: "3.2 MB",
		cells_count: 47,
	}
}

pub fn notebook() -> Notebook {
	let cells = vec![
		Cell {
			cell_type: CellType::Markdown,
			source: vec![
				"# Bank Marketing Classification Analysis\n",
				"\n",
				"## Executive Summary\n",
				"This notebook compares 6 machine learning algorithms for classifying bank customers in direct marketing campaigns.\n",
			],
		},
		Cell {
			cell_type: CellType::Code,
			source: vec![
				"# Import the required libraries\n",
				"import pandas as pd\n",
				"import numpy as np\n",
				"from sklearn.ensemble import RandomForestClassifier\n",
				"from sklearn.svm import SVC\n",
				"from sklearn.naive_bayes import GaussianNB\n",
				"from sklearn.neighbors import KNeighborsClassifier\n",
				"from sklearn.neural_network import MLPClassifier\n",
				"from sklearn.gaussian_process import GaussianProcessClassifier\n",
				"from sklearn.model_selection import train_test_split, GridSearchCV\n",
				"from sklearn.preprocessing import StandardScaler, LabelEncoder\n",
				"from sklearn.metrics import classification_report, confusion_matrix, roc_auc_score\n",
				"import matplotlib.pyplot as plt\n",
				"import seaborn as sns\n",
				"import warnings\n",
				"warnings.filterwarnings('ignore')\n",
			],
		},
		Cell {
			cell_type: CellType::Markdown,
			source: vec![
				"## 1. Loading and Exploring the Data\n",
				"\n",
				"The dataset comes from the direct marketing campaigns of a Portuguese bank and holds 41,188 customers with 20 predictors and 1 target.\n",
			],
		},
		Cell {
			cell_type: CellType::Code,
			source: vec![
				"# Load the dataset\n",
				"df = pd.read_csv('bank-additional-full.csv', sep=';')\n",
				"\n",
				"print(f'Dataset shape: {df.shape}')\n",
				"print(f'Columns: {list(df.columns)}')\n",
				"print(f'Missing values: {df.isnull().sum().sum()}')\n",
				"\n",
				"print('\\nTarget distribution:')\n",
				"print(df['y'].value_counts())\n",
				"print(f'Balance ratio: {df[\"y\"].value_counts()[\"yes\"] / len(df):.3f}')\n",
			],
		},
	];
	Notebook {
		cells,
		metadata: json!({
			"kernelspec": {
				"display_name": "Python 3",
				"language": "python",
				"name": "python3"
			},
			"language_info": {
				"name": "python",
				"version": "3.8.0"
			}
		}),
		nbformat: 4,
		nbformat_minor: 4,
	}
}

#[tokio::test(start_paused = true)]
async fn test_generate() {
	let start = tokio::time::Instant::now();
	let generated = generate(Duration::from_secs(2)).await;
	assert!(start.elapsed() >= Duration::from_secs(2));
	assert_eq!(generated.filename, NOTEBOOK_FILENAME);
	let cell_types: Vec<CellType> = generated
		.notebook
		.cells
		.iter()
		.map(|cell| cell.cell_type)
		.collect();
	assert_eq!(
		cell_types,
		vec![
			CellType::Markdown,
			CellType::Code,
			CellType::Markdown,
			CellType::Code
		]
	);
	let notebook = serde_json::to_value(&generated.notebook).unwrap();
	assert_eq!(notebook["metadata"]["kernelspec"]["name"], "python3");
	assert_eq!(notebook["nbformat"], 4);
}
