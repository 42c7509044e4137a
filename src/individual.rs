/*!

An individual of the population: a configuration of the topology scored by the fitness function of the run.

The genetic operators, mutation and crossover, never modify an individual. They build new configurations and score them anew.

*/

use std::fmt::{self,Display,Formatter};
use std::rc::Rc;

use crate::configuration::TopologyConfiguration;
use crate::fitness::{self,FitnessFunction};
use crate::input::TopologyInput;
use crate::random::TopologyRandom;

///A configuration together with its fitness. The fitness is computed on creation and never changes; the genetic operators return new individuals.
#[derive(Debug,Clone)]
pub struct Individual
{
	input: Rc<TopologyInput>,
	configuration: TopologyConfiguration,
	fitness: f64,
}

impl Individual
{
	pub fn new(input:Rc<TopologyInput>, configuration:TopologyConfiguration, fitness_function:&dyn FitnessFunction) -> Individual
	{
		let fitness = fitness_function.evaluate(&input,&configuration);
		Individual{input,configuration,fitness}
	}
	pub fn create_random(input:Rc<TopologyInput>, fitness_function:&dyn FitnessFunction, random:&mut TopologyRandom) -> Individual
	{
		let configuration = TopologyConfiguration::create_random(&input,random);
		Individual::new(input,configuration,fitness_function)
	}
	pub fn cross(lhs:&Individual, rhs:&Individual, fitness_function:&dyn FitnessFunction, random:&mut TopologyRandom) -> Individual
	{
		let configuration = TopologyConfiguration::cross(&lhs.input,&lhs.configuration,&rhs.configuration,random);
		Individual::new(lhs.input.clone(),configuration,fitness_function)
	}
	pub fn mutate(&self, probability:f64, fitness_function:&dyn FitnessFunction, random:&mut TopologyRandom) -> Individual
	{
		let configuration = TopologyConfiguration::mutate(&self.input,probability,&self.configuration,random);
		Individual::new(self.input.clone(),configuration,fitness_function)
	}
	pub fn fitness(&self) -> f64
	{
		self.fitness
	}
	pub fn configuration(&self) -> &TopologyConfiguration
	{
		&self.configuration
	}
	pub fn input(&self) -> &TopologyInput
	{
		&self.input
	}
	pub fn traffic_difference(&self) -> usize
	{
		fitness::calculate_traffic_difference(&self.input,&self.configuration)
	}
	pub fn port_penalty(&self) -> usize
	{
		fitness::calculate_port_penalty(&self.input,&self.configuration)
	}
	pub fn traffic(&self) -> usize
	{
		fitness::calculate_traffic(&self.configuration)
	}
}

impl Display for Individual
{
	fn fmt(&self, f:&mut Formatter) -> fmt::Result
	{
		write!(f,"{}",self.configuration)?;
		writeln!(f,"Fitness: {}",self.fitness)?;
		writeln!(f,"Port penalty: {}",self.port_penalty())?;
		writeln!(f,"Difference: {}",self.traffic_difference())?;
		writeln!(f,"Traffic: {}",self.traffic())
	}
}
