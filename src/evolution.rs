/*!

The generational loop of the search.

Each generation the population is sorted by fitness, a pool of the same size is drawn by roulette, the pool is shuffled and paired, and each pair gives two children, each one the mutation of a crossover of the pair. The children replace the whole population, except for the best `elitism` individuals of the previous generation, which replace the worst children.

The loop stops when the best individual has infinite fitness, or when it exhausts the generations or the time given in the termination.

```ignore
OptimalFitness{
	maximum_generations: 1000,//optional
	time_limit: 60,//seconds, optional
}
```

*/

use std::fmt::{self,Display,Formatter};
use std::io::Write;
use std::rc::Rc;
use std::time::{Duration,Instant};

use indicatif::{ProgressBar,ProgressStyle};
use log::{debug,info,warn};
use rand::seq::SliceRandom;

use crate::config_parser::ConfigurationValue;
use crate::error::Error;
use crate::fitness::{new_fitness,FitnessBuilderArgument,FitnessFunction,TrafficDifference};
use crate::individual::Individual;
use crate::input::{BandwidthOptions,InputOptions,TopologyInput,TrafficOptions};
use crate::random::TopologyRandom;
use crate::{error,match_object,Plugs};

///When to stop the search besides reaching an optimal individual.
#[derive(Debug,Clone,Default,PartialEq)]
pub struct Termination
{
	pub maximum_generations: Option<usize>,
	pub time_limit: Option<Duration>,
}

impl Termination
{
	pub fn new(cv:&ConfigurationValue) -> Result<Termination,Error>
	{
		let mut maximum_generations=None;
		let mut time_limit=None;
		match_object!(cv,"OptimalFitness",value,
			"maximum_generations" => maximum_generations=Some(value.as_usize().map_err(|e|e.with_message("bad value for maximum_generations".to_string()))?),
			"time_limit" => {
				let seconds = value.as_f64().map_err(|e|e.with_message("bad value for time_limit".to_string()))?;
				if !seconds.is_finite() || seconds<0.0
				{
					return Err(cv.ill("time_limit must be a non-negative number of seconds"));
				}
				time_limit=Some(Duration::from_secs_f64(seconds));
			},
		);
		Ok(Termination{maximum_generations,time_limit})
	}
}

///The parameters of the genetic operators and of the loop.
#[derive(Debug,Clone,PartialEq)]
pub struct EvolutionOptions
{
	///Number of individuals in each generation. Must be even, as the pool is paired.
	pub population_size: usize,
	pub mutation_probability: f64,
	///Number of best individuals copied into the next generation.
	pub elitism: usize,
	pub termination: Termination,
}

impl EvolutionOptions
{
	pub fn validate(&self) -> Result<(),Error>
	{
		if self.population_size<2 || self.population_size%2!=0
		{
			return Err(error!(bad_argument,format!("population_size={}",self.population_size)).with_message("the population size must be even and at least 2".to_string()));
		}
		if !(0.0..=1.0).contains(&self.mutation_probability)
		{
			return Err(error!(bad_argument,format!("mutation_probability={}",self.mutation_probability)).with_message("the mutation probability must be in [0,1]".to_string()));
		}
		if self.elitism>=self.population_size
		{
			return Err(error!(bad_argument,format!("elitism={}",self.elitism)).with_message(format!("elitism must be lower than the population size {}",self.population_size)));
		}
		Ok(())
	}
}

pub struct Evolution
{
	input: Rc<TopologyInput>,
	options: EvolutionOptions,
	fitness_function: Box<dyn FitnessFunction>,
	random: TopologyRandom,
	///Sorted by decreasing fitness.
	population: Vec<Individual>,
	///Number of generations replaced so far.
	generation: usize,
	started: Instant,
	///The wall time at which the evolution was built, to be reported.
	start_timestamp: String,
}

impl Evolution
{
	/**
	Build the evolution from a `Configuration` object.
	Generates the instance with the `random_seed` and creates the initial population.
	**/
	pub fn new(cv:&ConfigurationValue, plugs:&Plugs) -> Result<Evolution,Error>
	{
		let mut seed=42;
		let mut hosts=None;
		let mut routers=None;
		let mut minimum_ports=None;
		let mut maximum_ports=None;
		let mut traffic=None;
		let mut bandwidth=None;
		let mut population_size=None;
		let mut mutation_probability=None;
		let mut fitness_cv=None;
		let mut termination=Termination::default();
		let mut elitism=0;
		match_object!(cv,"Configuration",value,
			"random_seed" => seed=value.as_u64().map_err(|e|e.with_message("bad value for random_seed".to_string()))?,
			"hosts" => hosts=Some(value.as_usize().map_err(|e|e.with_message("bad value for hosts".to_string()))?),
			"routers" => routers=Some(value.as_usize().map_err(|e|e.with_message("bad value for routers".to_string()))?),
			"minimum_ports" => minimum_ports=Some(value.as_usize().map_err(|e|e.with_message("bad value for minimum_ports".to_string()))?),
			"maximum_ports" => maximum_ports=Some(value.as_usize().map_err(|e|e.with_message("bad value for maximum_ports".to_string()))?),
			"traffic" => traffic=Some(TrafficOptions::new(value)?),
			"bandwidth" => bandwidth=Some(BandwidthOptions::new(value)?),
			"population_size" => population_size=Some(value.as_usize().map_err(|e|e.with_message("bad value for population_size".to_string()))?),
			"mutation_probability" => mutation_probability=Some(value.as_f64().map_err(|e|e.with_message("bad value for mutation_probability".to_string()))?),
			"fitness" => fitness_cv=Some(value),
			"termination" => termination=Termination::new(value)?,
			"elitism" => elitism=value.as_usize().map_err(|e|e.with_message("bad value for elitism".to_string()))?,
		);
		let input_options = InputOptions{
			hosts: hosts.ok_or_else(||cv.ill("There were no hosts"))?,
			routers: routers.ok_or_else(||cv.ill("There were no routers"))?,
			minimum_ports: minimum_ports.ok_or_else(||cv.ill("There were no minimum_ports"))?,
			maximum_ports,
			traffic: traffic.ok_or_else(||cv.ill("There were no traffic"))?,
			bandwidth: bandwidth.ok_or_else(||cv.ill("There were no bandwidth"))?,
		};
		let options = EvolutionOptions{
			population_size: population_size.ok_or_else(||cv.ill("There were no population_size"))?,
			mutation_probability: mutation_probability.ok_or_else(||cv.ill("There were no mutation_probability"))?,
			elitism,
			termination,
		};
		options.validate()?;
		let fitness_function : Box<dyn FitnessFunction> = match fitness_cv
		{
			Some(fitness_cv) => new_fitness(FitnessBuilderArgument{cv:fitness_cv,plugs})?,
			None => Box::new(TrafficDifference{}),
		};
		let mut random = TopologyRandom::new(seed);
		let input = TopologyInput::generate(&input_options,&mut random)?;
		debug!("generated instance:\n{}",input);
		Evolution::from_input(input,options,fitness_function,random)
	}
	///Build the evolution over an already existing instance.
	pub fn from_input(input:TopologyInput, options:EvolutionOptions, fitness_function:Box<dyn FitnessFunction>, mut random:TopologyRandom) -> Result<Evolution,Error>
	{
		options.validate()?;
		let input = Rc::new(input);
		let mut population : Vec<Individual> = (0..options.population_size).map(|_|Individual::create_random(input.clone(),fitness_function.as_ref(),&mut random)).collect();
		sort_population(&mut population);
		Ok(Evolution{
			input,
			options,
			fitness_function,
			random,
			population,
			generation: 0,
			started: Instant::now(),
			start_timestamp: chrono::Local::now().to_rfc3339(),
		})
	}
	pub fn input(&self) -> &TopologyInput
	{
		&self.input
	}
	pub fn options(&self) -> &EvolutionOptions
	{
		&self.options
	}
	///The current population, sorted by decreasing fitness.
	pub fn population(&self) -> &[Individual]
	{
		&self.population
	}
	pub fn best(&self) -> &Individual
	{
		&self.population[0]
	}
	pub fn generation(&self) -> usize
	{
		self.generation
	}
	///Whether the best individual cannot be improved.
	pub fn is_optimal(&self) -> bool
	{
		self.best().fitness() == f64::INFINITY
	}
	///Whether the loop should stop.
	pub fn is_finished(&self) -> bool
	{
		if self.is_optimal()
		{
			return true;
		}
		if let Some(maximum_generations) = self.options.termination.maximum_generations
		{
			if self.generation>=maximum_generations
			{
				return true;
			}
		}
		if let Some(time_limit) = self.options.termination.time_limit
		{
			if self.started.elapsed()>=time_limit
			{
				return true;
			}
		}
		false
	}
	///Replace the population by the next generation.
	pub fn step(&mut self)
	{
		let cumulative = calculate_cumulative_probabilities(&self.population);
		let mut pool : Vec<&Individual> = Vec::with_capacity(self.options.population_size);
		for _ in 0..self.options.population_size
		{
			let index = roulette_select(&cumulative,&mut self.random);
			pool.push(&self.population[index]);
		}
		let mut offspring = reproduce(pool,self.options.mutation_probability,self.fitness_function.as_ref(),&mut self.random);
		if self.options.elitism>0
		{
			sort_population(&mut offspring);
			offspring.truncate(self.options.population_size-self.options.elitism);
			offspring.extend(self.population.iter().take(self.options.elitism).cloned());
		}
		let previous_best = self.best().fitness();
		self.population = offspring;
		sort_population(&mut self.population);
		self.generation+=1;
		let best = self.best().fitness();
		if best>previous_best
		{
			info!("generation {}: new best fitness {}",self.generation,best);
		}
		debug!("generation {}: best fitness {} worst fitness {}",self.generation,best,self.population[self.population.len()-1].fitness());
	}
	///Advance generations until finished.
	pub fn run(&mut self)
	{
		info!("starting evolution of {} individuals with {} hosts and {} routers",self.options.population_size,self.input.hosts,self.input.routers);
		while !self.is_finished()
		{
			self.step();
		}
		self.report_end();
	}
	///Like `run` but drawing a progress bar in the terminal.
	pub fn run_with_progress(&mut self)
	{
		let progress = match self.options.termination.maximum_generations
		{
			Some(maximum_generations) =>
			{
				let bar = ProgressBar::new(maximum_generations as u64);
				bar.set_style(ProgressStyle::default_bar().template("{elapsed_precise} [{bar:40}] {pos}/{len} generations, {msg}"));
				bar
			},
			None => ProgressBar::new_spinner(),
		};
		while !self.is_finished()
		{
			self.step();
			progress.inc(1);
			progress.set_message(format!("best fitness {}",self.best().fitness()));
		}
		progress.finish();
		self.report_end();
	}
	fn report_end(&self)
	{
		if self.is_optimal()
		{
			info!("optimal configuration found after {} generations",self.generation);
		}
		else
		{
			info!("stopped after {} generations with best fitness {}",self.generation,self.best().fitness());
		}
	}
	///The results of the run as a `Result` object.
	pub fn get_results(&self) -> ConfigurationValue
	{
		let best = self.best();
		let configuration = best.configuration();
		let numbers = |list:&[usize]| ConfigurationValue::Array(list.iter().map(|&x|ConfigurationValue::Number(x as f64)).collect());
		let result_content = vec![
			(String::from("generations"),ConfigurationValue::Number(self.generation as f64)),
			(String::from("optimal"),if self.is_optimal() {ConfigurationValue::True} else {ConfigurationValue::False}),
			(String::from("best_fitness"),ConfigurationValue::Number(best.fitness())),
			(String::from("traffic_difference"),ConfigurationValue::Number(best.traffic_difference() as f64)),
			(String::from("port_penalty"),ConfigurationValue::Number(best.port_penalty() as f64)),
			(String::from("total_traffic"),ConfigurationValue::Number(best.traffic() as f64)),
			(String::from("membership_table"),numbers(configuration.membership_table())),
			(String::from("router_types"),ConfigurationValue::Array(configuration.router_type_table().iter().map(|router_type|ConfigurationValue::Literal(router_type.to_string())).collect())),
			(String::from("ports_count"),numbers(&self.input.ports_count[..])),
			(String::from("start_time"),ConfigurationValue::Literal(self.start_timestamp.clone())),
			(String::from("elapsed_seconds"),ConfigurationValue::Number(self.started.elapsed().as_secs_f64())),
		];
		ConfigurationValue::Object(String::from("Result"),result_content)
	}
	///Write the results somewhere, typically a results file or the standard output.
	pub fn write_result(&self, output:&mut dyn Write) -> Result<(),Error>
	{
		writeln!(output,"{}",self.get_results().format_terminal()).map_err(|e|error!(undetermined).with_message(format!("could not write the results: {}",e)))
	}
}

impl Display for Evolution
{
	fn fmt(&self, f:&mut Formatter) -> fmt::Result
	{
		writeln!(f,"Generation {}",self.generation)?;
		write!(f,"{}",self.best())
	}
}

///Sort by decreasing fitness. Ties keep their order.
pub fn sort_population(population:&mut [Individual])
{
	population.sort_by(|a,b|b.fitness().total_cmp(&a.fitness()));
}

/**
The cumulative share of the fitness of the population, in the order of the population.
Individuals with infinite fitness share the whole wheel. If every fitness is zero the wheel is even.
**/
pub fn calculate_cumulative_probabilities(population:&[Individual]) -> Vec<f64>
{
	let weights : Vec<f64> = if population.iter().any(|individual|individual.fitness()==f64::INFINITY)
	{
		population.iter().map(|individual|if individual.fitness()==f64::INFINITY {1.0} else {0.0}).collect()
	}
	else
	{
		population.iter().map(|individual|individual.fitness()).collect()
	};
	let mut total : f64 = weights.iter().sum();
	let weights = if total>0.0 { weights } else {
		total = population.len() as f64;
		vec![1.0;population.len()]
	};
	let mut accumulated = 0.0;
	weights.iter().map(|weight|{
		accumulated += weight/total;
		accumulated
	}).collect()
}

/**
Spin the roulette. Returns the first index whose cumulative probability reaches a uniform draw.
If rounding left the last cumulative value below the draw, the last index is returned.
**/
pub fn roulette_select(cumulative:&[f64], random:&mut TopologyRandom) -> usize
{
	let draw = random.uniform();
	match cumulative.iter().position(|&probability|draw<=probability)
	{
		Some(index) => index,
		None =>
		{
			warn!("roulette draw {} beyond the last cumulative probability {:?}",draw,cumulative.last());
			cumulative.len()-1
		}
	}
}

/**
Shuffle the pool and breed its consecutive pairs. Each pair gives two children.
Panics if the pool has odd size.
**/
pub fn reproduce(mut pool:Vec<&Individual>, mutation_probability:f64, fitness_function:&dyn FitnessFunction, random:&mut TopologyRandom) -> Vec<Individual>
{
	assert!(pool.len()%2==0,"cannot pair a pool of {} individuals",pool.len());
	pool.shuffle(random.rng());
	let mut offspring = Vec::with_capacity(pool.len());
	for pair in pool.chunks(2)
	{
		for _ in 0..2
		{
			let child = Individual::cross(pair[0],pair[1],fitness_function,random);
			offspring.push(child.mutate(mutation_probability,fitness_function,random));
		}
	}
	offspring
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config_parser;
	use crate::fitness::TotalTraffic;
	const CONFIGURATION: &str = "Configuration{
		random_seed: 7,
		hosts: 12,
		routers: 3,
		minimum_ports: 2,
		traffic: Traffic{ non_zero_chance:0.5, amount:4500, offset:500 },
		bandwidth: Bandwidth{ amount:20000, offset:3000 },
		population_size: 10,
		mutation_probability: 0.05,
		termination: OptimalFitness{ maximum_generations: 15 },
	}";
	fn evolution(text:&str) -> Result<Evolution,Error>
	{
		let cv = config_parser::parse(text).expect("parse");
		Evolution::new(&cv,&Plugs::default())
	}
	fn is_sorted(population:&[Individual]) -> bool
	{
		population.windows(2).all(|pair|pair[0].fitness()>=pair[1].fitness())
	}
	#[test]
	fn population_stays_sorted()
	{
		let mut evolution = evolution(CONFIGURATION).expect("valid configuration");
		assert!(is_sorted(evolution.population()));
		for _ in 0..10
		{
			evolution.step();
			assert_eq!(evolution.population().len(),10);
			assert!(is_sorted(evolution.population()));
		}
		assert_eq!(evolution.generation(),10);
	}
	#[test]
	fn run_respects_the_generation_cap()
	{
		let mut evolution = evolution(CONFIGURATION).expect("valid configuration");
		evolution.run();
		assert!(evolution.is_optimal() || evolution.generation()==15);
		assert!(evolution.generation()<=15);
	}
	#[test]
	fn same_seed_same_run()
	{
		let mut first = evolution(CONFIGURATION).expect("valid configuration");
		let mut second = evolution(CONFIGURATION).expect("valid configuration");
		first.run();
		second.run();
		assert_eq!(first.best().configuration(),second.best().configuration());
		assert_eq!(first.best().fitness(),second.best().fitness());
	}
	#[test]
	fn elitism_keeps_the_best()
	{
		let text = CONFIGURATION.replace("termination:","elitism: 2, termination:");
		let mut evolution = evolution(&text).expect("valid configuration");
		let mut best = evolution.best().fitness();
		for _ in 0..10
		{
			evolution.step();
			assert!(evolution.best().fitness()>=best);
			best = evolution.best().fitness();
		}
	}
	#[test]
	fn bad_configurations_are_rejected()
	{
		assert!(evolution(&CONFIGURATION.replace("population_size: 10","population_size: 9")).is_err());
		assert!(evolution(&CONFIGURATION.replace("mutation_probability: 0.05","mutation_probability: 1.5")).is_err());
		assert!(evolution(&CONFIGURATION.replace("routers: 3","routers: 13")).is_err());
		assert!(evolution(&CONFIGURATION.replace("minimum_ports: 2,","")).is_err());
		assert!(evolution(&CONFIGURATION.replace("termination:","elitism: 10, termination:")).is_err());
		assert!(evolution(&CONFIGURATION.replace("termination:","fitness: Fastest, termination:")).is_err());
		assert!(evolution(&CONFIGURATION.replace("termination:","colour: 3, termination:")).is_err());
	}
	#[test]
	fn cumulative_probabilities()
	{
		let mut random = TopologyRandom::new(1);
		let mut evolution = evolution(CONFIGURATION).expect("valid configuration");
		evolution.step();
		let cumulative = calculate_cumulative_probabilities(evolution.population());
		assert_eq!(cumulative.len(),10);
		assert!(cumulative.windows(2).all(|pair|pair[0]<=pair[1]));
		assert!((cumulative[9]-1.0).abs()<1e-9);
		let mut counts = vec![0;10];
		for _ in 0..1000
		{
			counts[roulette_select(&cumulative,&mut random)]+=1;
		}
		assert_eq!(counts.iter().sum::<usize>(),1000);
	}
	#[test]
	fn roulette_follows_the_shares()
	{
		let mut random = TopologyRandom::new(3);
		// Shares of 10%, 10% and 80%.
		let cumulative = vec![0.1,0.2,1.0];
		let mut counts = vec![0;3];
		for _ in 0..10000
		{
			counts[roulette_select(&cumulative,&mut random)]+=1;
		}
		assert!((700..=1300).contains(&counts[0]),"counts {:?}",counts);
		assert!((700..=1300).contains(&counts[1]),"counts {:?}",counts);
		assert!((7600..=8400).contains(&counts[2]),"counts {:?}",counts);
		assert!(counts[2]>counts[0] && counts[2]>counts[1]);
	}
	#[test]
	fn roulette_boundaries()
	{
		let mut random = TopologyRandom::new(1);
		// Only the second individual has any share.
		let cumulative = vec![0.0,1.0,1.0];
		for _ in 0..100
		{
			assert_eq!(roulette_select(&cumulative,&mut random),1);
		}
		// A wheel that does not reach the draw falls back to the last one.
		let short = vec![-1.0,-1.0];
		assert_eq!(roulette_select(&short,&mut random),1);
	}
	#[test]
	#[should_panic(expected = "cannot pair")]
	fn odd_pools_are_refused()
	{
		let evolution = evolution(CONFIGURATION).expect("valid configuration");
		let mut random = TopologyRandom::new(2);
		let pool : Vec<&Individual> = evolution.population().iter().take(3).collect();
		reproduce(pool,0.1,&TotalTraffic{},&mut random);
	}
	#[test]
	fn results_describe_the_best()
	{
		let mut evolution = evolution(CONFIGURATION).expect("valid configuration");
		evolution.run();
		let mut output = Vec::new();
		evolution.write_result(&mut output).expect("write to memory");
		let text = String::from_utf8(output).expect("utf8");
		assert!(text.starts_with("Result"));
		assert!(text.contains("membership_table"));
		match evolution.get_results()
		{
			ConfigurationValue::Object(name,pairs) =>
			{
				assert_eq!(name,"Result");
				let generations = pairs.iter().find(|(key,_)|key=="generations").map(|(_,value)|value.clone());
				assert_eq!(generations,Some(ConfigurationValue::Number(evolution.generation() as f64)));
			},
			x => panic!("unexpected results {:?}",x),
		}
	}
	#[test]
	fn termination_from_configuration()
	{
		let cv = config_parser::parse("OptimalFitness{maximum_generations:3, time_limit:1.5}").expect("parse");
		let termination = Termination::new(&cv).expect("valid termination");
		assert_eq!(termination.maximum_generations,Some(3));
		assert_eq!(termination.time_limit,Some(Duration::from_millis(1500)));
		let cv = config_parser::parse("OptimalFitness{time_limit:-1}").expect("parse");
		assert!(Termination::new(&cv).is_err());
	}
}
