/*!

A `TopologyConfiguration` is a chromosome of the search: where each host is attached and how each router behaves.

The membership and router type tables are the genes. The subnetwork table and the channel load matrix are derived from them and are rebuilt every time a configuration is built, so there is no way to obtain a configuration whose derived tables disagree with its genes.

*/

use std::collections::BTreeSet;
use std::fmt::{self,Display,Formatter};

use itertools::Itertools;

use crate::input::TopologyInput;
use crate::matrix::SymmetricalMatrix;
use crate::random::TopologyRandom;
use crate::topology::{self,LoadOptions,RouterType};

#[derive(Debug,Clone,PartialEq)]
pub struct TopologyConfiguration
{
	///The router each host is attached to.
	membership_table: Vec<usize>,
	///The hosts attached to each router.
	subnetwork_table: Vec<BTreeSet<usize>>,
	router_type_table: Vec<RouterType>,
	///Simulated traffic over the channel between each pair of routers.
	channel_load_matrix: SymmetricalMatrix<usize>,
}

impl TopologyConfiguration
{
	/**
	Build a configuration from its genes, deriving the rest.
	Panics if the tables do not match the sizes of `input` or reference routers that do not exist.
	**/
	pub fn from_genes(input:&TopologyInput, membership_table:Vec<usize>, router_type_table:Vec<RouterType>) -> TopologyConfiguration
	{
		assert_eq!(router_type_table.len(),input.routers,"there must be a router type per router");
		let subnetwork_table = topology::create_subnetwork_table(input.hosts,input.routers,&membership_table);
		let channel_load_matrix = topology::create_load_matrix(input.hosts,input.routers,&LoadOptions{
			traffic_matrix: &input.traffic_matrix,
			subnetwork_table: &subnetwork_table,
			router_type_table: &router_type_table,
		});
		TopologyConfiguration{
			membership_table,
			subnetwork_table,
			router_type_table,
			channel_load_matrix,
		}
	}
	///A configuration with every gene drawn uniformly.
	pub fn create_random(input:&TopologyInput, random:&mut TopologyRandom) -> TopologyConfiguration
	{
		let membership_table = topology::create_membership_table(input.hosts,input.routers,random);
		let router_type_table = topology::create_router_type_table(input.routers,random);
		TopologyConfiguration::from_genes(input,membership_table,router_type_table)
	}
	/**
	Uniform crossover. Each host and each router takes its gene from `lhs` or from `rhs` with even chance.
	A draw over one half selects `lhs`.
	**/
	pub fn cross(input:&TopologyInput, lhs:&TopologyConfiguration, rhs:&TopologyConfiguration, random:&mut TopologyRandom) -> TopologyConfiguration
	{
		let membership_table = lhs.membership_table.iter().zip(rhs.membership_table.iter()).map(|(&left,&right)|{
			if random.uniform() > 0.5 { left } else { right }
		}).collect();
		let router_type_table = lhs.router_type_table.iter().zip(rhs.router_type_table.iter()).map(|(&left,&right)|{
			if random.uniform() > 0.5 { left } else { right }
		}).collect();
		TopologyConfiguration::from_genes(input,membership_table,router_type_table)
	}
	/**
	Replace each gene by a fresh uniform value with chance `probability`.
	The fresh value may be the same as the old one.
	**/
	pub fn mutate(input:&TopologyInput, probability:f64, conf:&TopologyConfiguration, random:&mut TopologyRandom) -> TopologyConfiguration
	{
		let membership_table = conf.membership_table.iter().map(|&router|{
			if random.uniform() < probability { random.index(input.routers) } else { router }
		}).collect();
		let router_type_table = conf.router_type_table.iter().map(|&router_type|{
			if random.uniform() < probability { RouterType::random(random) } else { router_type }
		}).collect();
		TopologyConfiguration::from_genes(input,membership_table,router_type_table)
	}
	pub fn membership_table(&self) -> &[usize]
	{
		&self.membership_table
	}
	pub fn subnetwork_table(&self) -> &[BTreeSet<usize>]
	{
		&self.subnetwork_table
	}
	pub fn router_type_table(&self) -> &[RouterType]
	{
		&self.router_type_table
	}
	pub fn channel_load_matrix(&self) -> &SymmetricalMatrix<usize>
	{
		&self.channel_load_matrix
	}
}

impl Display for TopologyConfiguration
{
	fn fmt(&self, f:&mut Formatter) -> fmt::Result
	{
		writeln!(f,"Membership: {}",self.membership_table.iter().enumerate().map(|(host,router)|format!("{}->{}",host,router)).join(" "))?;
		writeln!(f,"Subnetworks:")?;
		for (router,hosts) in self.subnetwork_table.iter().enumerate()
		{
			writeln!(f,"  [{}] {}: {{{}}}",router,self.router_type_table[router],hosts.iter().join(","))?;
		}
		writeln!(f,"Load:")?;
		write!(f,"{}",self.channel_load_matrix)
	}
}
