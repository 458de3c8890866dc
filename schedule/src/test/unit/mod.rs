mod cycles;
mod order;
mod partition;
mod tile;
