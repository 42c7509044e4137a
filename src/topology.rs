/*!

Derivation of the tables of a topology: which router each host hangs from, the inverse subnetworks, the behaviour of each router, and the load that all this puts on the channels between routers.

*/

use std::collections::BTreeSet;
use std::fmt::{self,Display,Formatter};

use crate::matrix::{Matrix,SymmetricalMatrix};
use crate::random::TopologyRandom;

///How a router treats the traffic leaving its subnetwork.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum RouterType
{
	///Routes traffic. Only traffic to the other end of a channel goes through it.
	Switch,
	///Broadcasts all received traffic into every channel.
	Hub,
}

impl RouterType
{
	pub const COUNT: usize = 2;
	pub fn from_index(index:usize) -> RouterType
	{
		match index
		{
			0 => RouterType::Switch,
			1 => RouterType::Hub,
			_ => panic!("there is no router type with index {}",index),
		}
	}
	///A router type chosen uniformly.
	pub fn random(random:&mut TopologyRandom) -> RouterType
	{
		RouterType::from_index(random.index(RouterType::COUNT))
	}
}

impl Display for RouterType
{
	fn fmt(&self, f:&mut Formatter) -> fmt::Result
	{
		match self
		{
			RouterType::Switch => write!(f,"switch"),
			RouterType::Hub => write!(f,"hub"),
		}
	}
}

///The tables the load of the channels depends on.
pub struct LoadOptions<'a>
{
	pub traffic_matrix: &'a Matrix<usize>,
	pub subnetwork_table: &'a [BTreeSet<usize>],
	pub router_type_table: &'a [RouterType],
}

///Assign each host to a uniformly random router.
pub fn create_membership_table(hosts:usize, routers:usize, random:&mut TopologyRandom) -> Vec<usize>
{
	(0..hosts).map(|_|random.index(routers)).collect()
}

///The hosts of each router. The exact inverse of `membership_table`.
pub fn create_subnetwork_table(hosts:usize, routers:usize, membership_table:&[usize]) -> Vec<BTreeSet<usize>>
{
	assert_eq!(membership_table.len(),hosts,"the membership table must have an entry per host");
	let mut result = vec![BTreeSet::new();routers];
	for (host,&router) in membership_table.iter().enumerate()
	{
		assert!(router<routers,"host {} is attached to router {} but there are only {} routers",host,router,routers);
		result[router].insert(host);
	}
	result
}

///Choose the type of each router uniformly.
pub fn create_router_type_table(routers:usize, random:&mut TopologyRandom) -> Vec<RouterType>
{
	(0..routers).map(|_|RouterType::random(random)).collect()
}

/**
Simulate the load of the channels between routers.

For each ordered pair of distinct routers `(r1,r2)`:
* If `r1` is a switch, the traffic from each host of `r1` to each host of `r2` goes into the channel.
* If `r1` is a hub, the traffic from each host of `r1` to every host in the network goes into the channel.

Both passes, `(r1,r2)` and `(r2,r1)`, add into the same cell of the symmetric result.
This is a simplified broadcast model; there is no spanning tree nor routing over several channels.
**/
pub fn create_load_matrix(hosts:usize, routers:usize, options:&LoadOptions) -> SymmetricalMatrix<usize>
{
	let mut load_matrix = SymmetricalMatrix::constant(0,routers);
	for router1 in 0..routers
	{
		let set1 = &options.subnetwork_table[router1];
		for router2 in 0..routers
		{
			if router1==router2
			{
				continue;
			}
			let load : usize = match options.router_type_table[router1]
			{
				RouterType::Switch =>
				{
					let set2 = &options.subnetwork_table[router2];
					set1.iter().map(|&host1|set2.iter().map(|&host2|*options.traffic_matrix.get(host1,host2)).sum::<usize>()).sum()
				},
				RouterType::Hub =>
				{
					set1.iter().map(|&host1|(0..hosts).map(|host2|*options.traffic_matrix.get(host1,host2)).sum::<usize>()).sum()
				},
			};
			let current = *load_matrix.get(router1,router2);
			load_matrix.set(router1,router2,current+load);
		}
	}
	load_matrix
}
