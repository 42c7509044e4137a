/*!

Fitness functions score a configuration; higher is better.

The search stops as soon as some individual scores `f64::INFINITY`, so a fitness function should give infinity exactly to the configurations that cannot be improved.

# Fitness functions

## TrafficDifference

The default. Measures how far the simulated load of each channel is from its bandwidth, and amplifies it by the excess of hosts over the ports of their routers.
The fitness is `1/(d+d*p)`, with `d` the traffic difference and `p` the port penalty. A configuration matching every bandwidth exactly gets infinity.

```ignore
TrafficDifference
```

## TotalTraffic

The reciprocal of the total simulated load, ignoring bandwidths and ports.

```ignore
TotalTraffic
```

*/

use std::fmt::Debug;

use crate::config_parser::ConfigurationValue;
use crate::configuration::TopologyConfiguration;
use crate::error::Error;
use crate::input::TopologyInput;
use crate::{error,match_object,Plugs};

///A way to score configurations.
pub trait FitnessFunction : Debug
{
	fn evaluate(&self, input:&TopologyInput, conf:&TopologyConfiguration) -> f64;
}

///The argument of a builder function for `FitnessFunction`s.
#[derive(Debug)]
pub struct FitnessBuilderArgument<'a>
{
	///A ConfigurationValue::Object defining the fitness function.
	pub cv: &'a ConfigurationValue,
	///The user defined plugs. In case the fitness function needs to create elements.
	pub plugs: &'a Plugs,
}

///Build a fitness function from its configuration, looking first into the plugs.
pub fn new_fitness(arg:FitnessBuilderArgument) -> Result<Box<dyn FitnessFunction>,Error>
{
	if let &ConfigurationValue::Object(ref cv_name, ref _cv_pairs)=arg.cv
	{
		if let Some(builder) = arg.plugs.fitness_builder(cv_name)
		{
			return builder(arg);
		}
		match cv_name.as_ref()
		{
			"TrafficDifference" => Ok(Box::new(TrafficDifference::new(arg)?)),
			"TotalTraffic" => Ok(Box::new(TotalTraffic::new(arg)?)),
			_ => Err(error!(ill_formed_configuration,arg.cv.clone()).with_message(format!("Unknown fitness function {}",cv_name))),
		}
	}
	else
	{
		Err(error!(ill_formed_configuration,arg.cv.clone()).with_message("Trying to create a FitnessFunction from a non-Object".to_string()))
	}
}

///Sum of every cell of the load matrix.
pub fn calculate_traffic(conf:&TopologyConfiguration) -> usize
{
	conf.channel_load_matrix().iter().sum()
}

///Sum over each channel of the distance between its simulated load and its bandwidth.
pub fn calculate_traffic_difference(input:&TopologyInput, conf:&TopologyConfiguration) -> usize
{
	let load = conf.channel_load_matrix();
	let mut difference = 0;
	for router1 in 0..input.routers
	{
		for router2 in router1+1..input.routers
		{
			let traffic = load.get(router1,router2) + load.get(router2,router1);
			let bandwidth = *input.bandwidth_matrix.get(router1,router2);
			difference += if traffic>bandwidth { traffic-bandwidth } else { bandwidth-traffic };
		}
	}
	difference
}

///Number of hosts attached beyond the ports of their routers.
pub fn calculate_port_penalty(input:&TopologyInput, conf:&TopologyConfiguration) -> usize
{
	conf.subnetwork_table().iter().zip(input.ports_count.iter()).map(|(hosts,&ports)|hosts.len().saturating_sub(ports)).sum()
}

#[derive(Debug)]
pub struct TrafficDifference
{
}

impl FitnessFunction for TrafficDifference
{
	fn evaluate(&self, input:&TopologyInput, conf:&TopologyConfiguration) -> f64
	{
		let difference = calculate_traffic_difference(input,conf) as f64;
		let penalty = calculate_port_penalty(input,conf) as f64;
		1.0 / (difference + difference*penalty)
	}
}

impl TrafficDifference
{
	pub fn new(arg:FitnessBuilderArgument) -> Result<TrafficDifference,Error>
	{
		match_object!(arg.cv,"TrafficDifference",_value,);
		Ok(TrafficDifference{})
	}
}

#[derive(Debug)]
pub struct TotalTraffic
{
}

impl FitnessFunction for TotalTraffic
{
	fn evaluate(&self, _input:&TopologyInput, conf:&TopologyConfiguration) -> f64
	{
		1.0 / calculate_traffic(conf) as f64
	}
}

impl TotalTraffic
{
	pub fn new(arg:FitnessBuilderArgument) -> Result<TotalTraffic,Error>
	{
		match_object!(arg.cv,"TotalTraffic",_value,);
		Ok(TotalTraffic{})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::matrix::{Matrix,SymmetricalMatrix};
	use crate::topology::RouterType;
	///Two routers with 2 ports each and bandwidth 10 between them.
	fn input(traffic:usize) -> TopologyInput
	{
		let mut traffic_matrix = Matrix::constant(0,4,4);
		*traffic_matrix.get_mut(0,2) = traffic;
		let mut bandwidth_matrix = SymmetricalMatrix::constant(0,2);
		bandwidth_matrix.set(0,1,10);
		TopologyInput::new(vec![2,2],traffic_matrix,bandwidth_matrix)
	}
	#[test]
	fn traffic_difference_counts_both_directions()
	{
		let input = input(3);
		let conf = TopologyConfiguration::from_genes(&input,vec![0,0,1,1],vec![RouterType::Switch;2]);
		// The single cell holds 3, and the channel is read as 3+3.
		assert_eq!(calculate_traffic(&conf),6);
		assert_eq!(calculate_traffic_difference(&input,&conf),4);
		assert_eq!(calculate_port_penalty(&input,&conf),0);
		assert_eq!(TrafficDifference{}.evaluate(&input,&conf),0.25);
		assert_eq!(TotalTraffic{}.evaluate(&input,&conf),1.0/6.0);
	}
	#[test]
	fn port_penalty_amplifies()
	{
		let input = input(3);
		// Three hosts on router 0, which only has two ports.
		let conf = TopologyConfiguration::from_genes(&input,vec![0,0,0,1],vec![RouterType::Switch;2]);
		assert_eq!(calculate_port_penalty(&input,&conf),1);
		let difference = calculate_traffic_difference(&input,&conf) as f64;
		assert_eq!(TrafficDifference{}.evaluate(&input,&conf),1.0/(2.0*difference));
	}
	#[test]
	fn perfect_match_is_infinite()
	{
		let input = input(5);
		let conf = TopologyConfiguration::from_genes(&input,vec![0,0,1,1],vec![RouterType::Switch;2]);
		assert_eq!(calculate_traffic_difference(&input,&conf),0);
		assert_eq!(TrafficDifference{}.evaluate(&input,&conf),f64::INFINITY);
	}
	#[test]
	fn builder_knows_the_fitness_functions()
	{
		let plugs = Plugs::default();
		let cv = ConfigurationValue::Object("TotalTraffic".to_string(),vec![]);
		assert!(new_fitness(FitnessBuilderArgument{cv:&cv,plugs:&plugs}).is_ok());
		let cv = ConfigurationValue::Object("Fastest".to_string(),vec![]);
		assert!(new_fitness(FitnessBuilderArgument{cv:&cv,plugs:&plugs}).is_err());
		let cv = ConfigurationValue::Number(1.0);
		assert!(new_fitness(FitnessBuilderArgument{cv:&cv,plugs:&plugs}).is_err());
	}
}
