/*!
topoga-lib
=====

This crate searches network topologies with a genetic algorithm. Given the traffic between hosts, the bandwidth of the channels between routers and the ports of each router, it looks for an assignment of hosts to routers, and a behaviour for each router, such that the simulated load of every channel matches its bandwidth.

# Usage

Add `topoga-lib` to the dependencies of your project, or use the `topoga` binary built from this package.

```toml
[dependencies]
topoga-lib = "0.1"
```

# Public Interface

`topoga-lib` provides the function `file_main`, to be called from a binary with a configuration file, and `terminal_main`, which also processes the command line arguments.

The configuration file describes a run, or many of them when it contains experiment lists `![a,b,c]`. Each run generates a random instance and evolves a population of configurations over it. The results of each run are written as a `Result` object.

# Configuration Syntax

A run is written as a `Configuration` object.

```ignore
Configuration
{
	random_seed: 42,//seed of the instance and of the evolution, defaults to 42
	hosts: 12,
	routers: 3,
	minimum_ports: 2,//fewest ports of any router
	maximum_ports: 8,//optional; most ports of any router
	traffic: Traffic{ non_zero_chance: 0.5, amount: 4500, offset: 500 },
	bandwidth: Bandwidth{ amount: 20000, offset: 3000 },
	population_size: 10,//must be even
	mutation_probability: 0.01,
	fitness: TrafficDifference,//optional; see the fitness module
	termination: OptimalFitness{ maximum_generations: 1000 },//optional; see the evolution module
	elitism: 0,//optional; best individuals kept between generations
	legend_name: "a name that is ignored",
}
```

Values can be overridden from the command line with free arguments such as `population_size=20` or `traffic.amount=300`.

# Plugging

`file_main` receives a `&Plugs` argument that may be used to provide new fitness functions. This way, one can make a copy of the `main` of the `topoga` binary and declare plugs for their implemented `FitnessFunction`.

*/

// --- crate attributes ---
// At clippy::correctness no problem should appear
	// $(cargo clippy -- -A clippy::all -W clippy::correctness)
// At clippy::style
	#![allow(clippy::needless_return)]
	#![allow(clippy::new_without_default)]
	#![allow(clippy::comparison_chain)]
	#![allow(clippy::single_match)]
	#![allow(clippy::let_and_return)]
	#![allow(clippy::len_without_is_empty)]
	#![allow(clippy::needless_range_loop)]
	#![allow(clippy::collapsible_else_if)]
	// Ignore these lints
	#![allow(clippy::match_ref_pats)]
	#![allow(clippy::tabs_in_doc_comments)]
// At clippy::complexity
	#![allow(clippy::type_complexity)]

pub mod error;
pub mod config_parser;
pub mod config;
pub mod matrix;
pub mod random;
pub mod ports;
pub mod input;
pub mod topology;
pub mod configuration;
pub mod fitness;
pub mod individual;
pub mod evolution;

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs::File;
use std::io::prelude::*;
use std::io::stdout;
use std::path::Path;

use log::{info,warn};

use config_parser::ConfigurationValue;
use config::{flatten_configuration_value,rewrite_free_argument};
use error::Error;
use evolution::Evolution;
use fitness::{FitnessFunction,FitnessBuilderArgument};

pub use configuration::TopologyConfiguration;
pub use individual::Individual;
pub use input::TopologyInput;
pub use random::TopologyRandom;

///User provided builders, searched before the ones of the crate.
#[derive(Default)]
pub struct Plugs
{
	fitness_functions: BTreeMap<String,fn(FitnessBuilderArgument) -> Result<Box<dyn FitnessFunction>,Error> >,
}

impl Plugs
{
	pub fn add_fitness(&mut self, key:String, builder:fn(FitnessBuilderArgument) -> Result<Box<dyn FitnessFunction>,Error>)
	{
		self.fitness_functions.insert(key,builder);
	}
	pub(crate) fn fitness_builder(&self, key:&str) -> Option<&fn(FitnessBuilderArgument) -> Result<Box<dyn FitnessFunction>,Error>>
	{
		self.fitness_functions.get(key)
	}
}

impl Debug for Plugs
{
	fn fmt(&self,f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error>
	{
		write!(f,"{};",self.fitness_functions.keys().map(|s|s.to_string()).collect::<Vec<String>>().join(","))
	}
}

/// Main when passed a configuration file as path
/// `file` must be a configuration file with the runs to perform.
/// `plugs` contains the plugged builder functions.
/// `results_file` indicates where to write the results. The standard output when `None`.
/// `free_args` are free arguments. Those of the form `path=value` are used to override configurations.
/// `progress` draws a progress bar while each run advances.
pub fn file_main(file:&mut File, plugs:&Plugs, mut results_file:Option<File>, free_args:&[String], progress:bool) -> Result<(),Error>
{
	let mut contents = String::new();
	file.read_to_string(&mut contents).map_err(|e|error!(undetermined).with_message(format!("could not read the configuration file: {}",e)))?;
	let mut value = config_parser::parse(&contents)?;
	for arg in free_args
	{
		if arg.contains('=')
		{
			rewrite_free_argument(&mut value,arg)?;
		}
		else
		{
			warn!("ignoring argument {}",arg);
		}
	}
	let flat=flatten_configuration_value(&value);
	if let ConfigurationValue::Experiments(ref experiments)=flat
	{
		for (i,experiment) in experiments.iter().enumerate()
		{
			info!("experiment {} of {} is {}",i,experiments.len(),experiment.format_terminal());
			let mut evolution=Evolution::new(experiment,plugs).map_err(|e|e.with_message(format!("while building experiment {}",i)))?;
			if progress
			{
				evolution.run_with_progress();
			}
			else
			{
				evolution.run();
			}
			match results_file
			{
				Some(ref mut f) => evolution.write_result(f)?,
				None => evolution.write_result(&mut stdout())?,
			};
		}
		Ok(())
	}
	else
	{
		Err(error!(ill_formed_configuration,value.clone()).with_message("there are not experiments".to_string()))
	}
}

pub fn terminal_default_options() -> getopts::Options
{
	let mut opts = getopts::Options::new();
	opts.optopt("r","results","file in which to write the results of the runs","FILE");
	opts.optflag("p","progress","draw a progress bar for each run");
	opts.optflag("h","help","show this help");
	opts
}

/// The standard main. `args` are the command line arguments, including the name of the binary.
pub fn terminal_main(args:&[String], plugs:&Plugs) -> Result<(),Error>
{
	let opts = terminal_default_options();
	let option_matches = opts.parse(&args[1..]).map_err(|e|error!(bad_argument,e.to_string()))?;
	if option_matches.opt_present("help") || option_matches.free.is_empty()
	{
		let brief = format!("Usage: {} [options] CONFIG_FILE [path=value ...]",args[0]);
		print!("{}",opts.usage(&brief));
		return Ok(());
	}
	let path=Path::new(&option_matches.free[0]);
	let mut f = File::open(&path).map_err(|err|error!(could_not_open_file,path.to_path_buf(),err).with_message("could not open configuration file.".to_string()))?;
	let results_file = match option_matches.opt_str("results")
	{
		Some(results) => Some(File::create(&results).map_err(|err|error!(could_not_open_file,Path::new(&results).to_path_buf(),err).with_message("could not create results file.".to_string()))?),
		None => None,
	};
	let free_args=&option_matches.free[1..];
	file_main(&mut f,plugs,results_file,free_args,option_matches.opt_present("progress"))
}
