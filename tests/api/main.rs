mod checkout_flow;
mod contact;
mod health_check;
mod helpers;
mod orders;
mod webhooks;
